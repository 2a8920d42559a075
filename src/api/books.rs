//! Catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookCreated, BookQuery, BookSummary, NewBook},
        copy::{AvailableCopy, BookCopy, NewCopy},
    },
};

/// List books, optionally searching title and author
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookSummary>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookSummary>>> {
    let books = state.services.catalog.search_books(query.search.as_deref()).await?;
    Ok(Json(books))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = NewBook,
    responses(
        (status = 201, description = "Book created", body = BookCreated),
        (status = 400, description = "Missing title or author"),
        (status = 404, description = "Unknown category or user")
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    Json(book): Json<NewBook>,
) -> AppResult<(StatusCode, Json<BookCreated>)> {
    let created = state.services.catalog.add_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the physical copies of a book
#[utoipa::path(
    get,
    path = "/books/{id}/copies",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Copies of the book", body = Vec<BookCopy>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_copies(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<BookCopy>>> {
    let copies = state.services.catalog.list_copies(id).await?;
    Ok(Json(copies))
}

/// Register another physical copy of a book
#[utoipa::path(
    post,
    path = "/books/{id}/copies",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = NewCopy,
    responses(
        (status = 201, description = "Copy created", body = BookCopy),
        (status = 404, description = "Book or user not found")
    )
)]
pub async fn add_copy(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Json(copy): Json<NewCopy>,
) -> AppResult<(StatusCode, Json<BookCopy>)> {
    let created = state.services.catalog.add_copy(id, copy.added_by).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Copies that can be issued
#[utoipa::path(
    get,
    path = "/copies/available",
    tag = "books",
    responses(
        (status = 200, description = "Available copies", body = Vec<AvailableCopy>)
    )
)]
pub async fn list_available_copies(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<AvailableCopy>>> {
    let copies = state.services.catalog.list_available_copies().await?;
    Ok(Json(copies))
}
