//! Error types for the circulation desk

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Numeric error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    DbFailure = 2,
    NoSuchData = 3,
    NoSuchStudent = 4,
    NoSuchCopy = 5,
    NoSuchIssue = 6,
    CopyUnavailable = 7,
    AlreadyReturned = 8,
    MaxBorrowsReached = 9,
    BadValue = 10,
}

/// Coarse classification of failures surfaced to the desk shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    Validation,
    Store,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Student with id {0} not found")]
    StudentNotFound(i64),

    #[error("Copy with id {0} not found")]
    CopyNotFound(i64),

    #[error("Issue log entry with id {0} not found")]
    LogEntryNotFound(i64),

    #[error("Copy {0} is already issued")]
    CopyUnavailable(i64),

    #[error("Issue log entry {0} has already been returned")]
    AlreadyReturned(i64),

    #[error("Borrowing limit reached: {0}")]
    BorrowingLimit(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_)
            | AppError::StudentNotFound(_)
            | AppError::CopyNotFound(_)
            | AppError::LogEntryNotFound(_) => ErrorKind::NotFound,
            AppError::CopyUnavailable(_)
            | AppError::AlreadyReturned(_)
            | AppError::BorrowingLimit(_) => ErrorKind::InvalidState,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Database(_) | AppError::Migration(_) | AppError::Internal(_) => {
                ErrorKind::Store
            }
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::NotFound(_) => ErrorCode::NoSuchData,
            AppError::StudentNotFound(_) => ErrorCode::NoSuchStudent,
            AppError::CopyNotFound(_) => ErrorCode::NoSuchCopy,
            AppError::LogEntryNotFound(_) => ErrorCode::NoSuchIssue,
            AppError::CopyUnavailable(_) => ErrorCode::CopyUnavailable,
            AppError::AlreadyReturned(_) => ErrorCode::AlreadyReturned,
            AppError::BorrowingLimit(_) => ErrorCode::MaxBorrowsReached,
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::Database(_) | AppError::Migration(_) => ErrorCode::DbFailure,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::BorrowingLimit(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            _ => {
                let status = match self.kind() {
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::InvalidState => StatusCode::CONFLICT,
                    ErrorKind::Validation => StatusCode::BAD_REQUEST,
                    ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, self.to_string())
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
