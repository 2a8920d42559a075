//! Report endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::report::{BorrowingLimitRow, DashboardSummary, LibrarianPerformanceRow, OverdueEntry},
};

/// Home screen counters
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "reports",
    responses(
        (status = 200, description = "Book, student and available copy counts", body = DashboardSummary)
    )
)]
pub async fn dashboard(State(state): State<crate::AppState>) -> AppResult<Json<DashboardSummary>> {
    let summary = state.services.reports.dashboard().await?;
    Ok(Json(summary))
}

/// Loans past their due date
#[utoipa::path(
    get,
    path = "/reports/overdue",
    tag = "reports",
    responses(
        (status = 200, description = "Overdue loans, most overdue first", body = Vec<OverdueEntry>)
    )
)]
pub async fn overdue(State(state): State<crate::AppState>) -> AppResult<Json<Vec<OverdueEntry>>> {
    let rows = state.services.reports.overdue().await?;
    Ok(Json(rows))
}

/// Borrowing cap usage per student category
#[utoipa::path(
    get,
    path = "/reports/borrowing-limits",
    tag = "reports",
    responses(
        (status = 200, description = "One row per student category", body = Vec<BorrowingLimitRow>)
    )
)]
pub async fn borrowing_limits(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<BorrowingLimitRow>>> {
    let rows = state.services.reports.borrowing_limits().await?;
    Ok(Json(rows))
}

/// Issue activity per librarian
#[utoipa::path(
    get,
    path = "/reports/librarian-performance",
    tag = "reports",
    responses(
        (status = 200, description = "One row per librarian", body = Vec<LibrarianPerformanceRow>)
    )
)]
pub async fn librarian_performance(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<LibrarianPerformanceRow>>> {
    let rows = state.services.reports.librarian_performance().await?;
    Ok(Json(rows))
}
