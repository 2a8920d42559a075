//! Circulation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::circulation::{
        ActiveIssue, AuditReport, IssueLogEntry, IssueReceipt, IssueRequest, ReturnReceipt,
    },
};

/// Issue a copy to a student
#[utoipa::path(
    post,
    path = "/issues",
    tag = "issues",
    request_body = IssueRequest,
    responses(
        (status = 201, description = "Copy issued", body = IssueReceipt),
        (status = 400, description = "Invalid duration"),
        (status = 404, description = "Copy, student or user not found"),
        (status = 409, description = "Copy already issued"),
        (status = 422, description = "Student at borrowing cap (enforce policy)")
    )
)]
pub async fn issue_copy(
    State(state): State<crate::AppState>,
    Json(request): Json<IssueRequest>,
) -> AppResult<(StatusCode, Json<IssueReceipt>)> {
    let receipt = state.services.circulation.issue_copy(request).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Return an issued copy
#[utoipa::path(
    post,
    path = "/issues/{id}/return",
    tag = "issues",
    params(("id" = i64, Path, description = "Issue log entry ID")),
    responses(
        (status = 200, description = "Copy returned", body = ReturnReceipt),
        (status = 404, description = "Log entry not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ReturnReceipt>> {
    let receipt = state.services.circulation.return_copy(id).await?;
    Ok(Json(receipt))
}

/// Get an issue log entry
#[utoipa::path(
    get,
    path = "/issues/{id}",
    tag = "issues",
    params(("id" = i64, Path, description = "Issue log entry ID")),
    responses(
        (status = 200, description = "Log entry", body = IssueLogEntry),
        (status = 404, description = "Log entry not found")
    )
)]
pub async fn get_issue(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<IssueLogEntry>> {
    let entry = state.services.circulation.get_issue(id).await?;
    Ok(Json(entry))
}

/// Copies currently out on loan
#[utoipa::path(
    get,
    path = "/issues/active",
    tag = "issues",
    responses(
        (status = 200, description = "Active loans", body = Vec<ActiveIssue>)
    )
)]
pub async fn list_active(State(state): State<crate::AppState>) -> AppResult<Json<Vec<ActiveIssue>>> {
    let issues = state.services.circulation.list_active().await?;
    Ok(Json(issues))
}

/// Issue history of one copy
#[utoipa::path(
    get,
    path = "/copies/{id}/history",
    tag = "issues",
    params(("id" = i64, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Log entries, newest first", body = Vec<IssueLogEntry>),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn copy_history(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<IssueLogEntry>>> {
    let history = state.services.circulation.copy_history(id).await?;
    Ok(Json(history))
}

/// Check copy flags and student counters against the issue log
#[utoipa::path(
    get,
    path = "/issues/audit",
    tag = "issues",
    responses(
        (status = 200, description = "Drift found, empty when consistent", body = AuditReport)
    )
)]
pub async fn audit(State(state): State<crate::AppState>) -> AppResult<Json<AuditReport>> {
    let report = state.services.circulation.audit().await?;
    Ok(Json(report))
}
