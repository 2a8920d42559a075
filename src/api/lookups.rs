//! Lookup lists backing the desk's select boxes

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::reference::{BookCategory, Branch, StudentCategory, User},
};

#[utoipa::path(
    get,
    path = "/lookups/book-categories",
    tag = "lookups",
    responses((status = 200, description = "Book categories", body = Vec<BookCategory>))
)]
pub async fn book_categories(State(state): State<crate::AppState>) -> AppResult<Json<Vec<BookCategory>>> {
    Ok(Json(state.services.catalog.book_categories().await?))
}

#[utoipa::path(
    get,
    path = "/lookups/student-categories",
    tag = "lookups",
    responses((status = 200, description = "Student categories with borrowing caps", body = Vec<StudentCategory>))
)]
pub async fn student_categories(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<StudentCategory>>> {
    Ok(Json(state.services.roster.student_categories().await?))
}

#[utoipa::path(
    get,
    path = "/lookups/branches",
    tag = "lookups",
    responses((status = 200, description = "Branches", body = Vec<Branch>))
)]
pub async fn branches(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Branch>>> {
    Ok(Json(state.services.roster.branches().await?))
}

#[utoipa::path(
    get,
    path = "/lookups/users",
    tag = "lookups",
    responses((status = 200, description = "Library staff", body = Vec<User>))
)]
pub async fn users(State(state): State<crate::AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(state.services.catalog.librarians().await?))
}
