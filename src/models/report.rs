//! Report rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Home screen counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub total_books: i64,
    pub total_students: i64,
    pub available_copies: i64,
}

/// Overdue loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OverdueEntry {
    pub log_id: i64,
    pub title: String,
    pub roll_number: String,
    pub student_name: String,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub days_overdue: i64,
}

impl OverdueEntry {
    /// Whole calendar days between the due date and `as_of`, never negative
    pub fn days_between(due_at: DateTime<Utc>, as_of: DateTime<Utc>) -> i64 {
        (as_of.date_naive() - due_at.date_naive()).num_days().max(0)
    }
}

/// Borrowing cap usage for one student category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowingLimitRow {
    pub category: String,
    pub max_allowed: i64,
    pub total_students: i64,
    /// Students with books_issued >= max_allowed
    pub exceeded_limit: i64,
}

/// Issue activity of one librarian
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LibrarianPerformanceRow {
    pub user_id: i64,
    pub librarian: String,
    pub total_issued: i64,
    pub currently_borrowed: i64,
}
