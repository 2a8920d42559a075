//! Student roster endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::student::{NewStudent, Student, UpdateApproval},
};

/// List registered students
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    responses(
        (status = 200, description = "Students with derived approval status", body = Vec<Student>)
    )
)]
pub async fn list_students(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Student>>> {
    let students = state.services.roster.list_students().await?;
    Ok(Json(students))
}

/// Get a student by ID
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Student>> {
    let student = state.services.roster.get_student(id).await?;
    Ok(Json(student))
}

/// Register a student
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    request_body = NewStudent,
    responses(
        (status = 201, description = "Student registered", body = Student),
        (status = 400, description = "Missing or invalid field"),
        (status = 404, description = "Unknown category or branch")
    )
)]
pub async fn add_student(
    State(state): State<crate::AppState>,
    Json(student): Json<NewStudent>,
) -> AppResult<(StatusCode, Json<Student>)> {
    let created = state.services.roster.add_student(student).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Approve, reject or reset a student's registration
#[utoipa::path(
    put,
    path = "/students/{id}/approval",
    tag = "students",
    params(("id" = i64, Path, description = "Student ID")),
    request_body = UpdateApproval,
    responses(
        (status = 200, description = "Updated student", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn set_approval(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateApproval>,
) -> AppResult<Json<Student>> {
    let student = state.services.roster.set_approval(id, update.decision).await?;
    Ok(Json(student))
}
