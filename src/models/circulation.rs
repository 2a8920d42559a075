//! Circulation models: issue log, requests, receipts and policy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::copy::AvailableStatus;

/// How the borrowing cap of a student category is applied at issue time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BorrowingPolicy {
    /// Reject issues for students already at their cap
    Enforce,
    /// Issue anyway, but flag the receipt and log a warning
    Advise,
    /// Issue without looking at the cap
    #[default]
    Ignore,
}

/// Longest loan, in days, accepted from a request or from configuration
pub const MAX_LOAN_DAYS: i64 = 365;

/// Issue log entry from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct IssueLogEntry {
    pub id: i64,
    pub copy_id: i64,
    pub student_id: i64,
    pub issued_by: i64,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    /// Set on return; the entry is active while this is empty
    pub returned_at: Option<DateTime<Utc>>,
    pub logged_at: DateTime<Utc>,
}

impl IssueLogEntry {
    pub fn is_active(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// Issue copy request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct IssueRequest {
    pub copy_id: i64,
    pub student_id: i64,
    /// Librarian performing the issue
    pub issued_by: i64,
    /// Loan length in days (default from configuration)
    #[validate(range(min = 1, max = 365, message = "Duration must be between 1 and 365 days"))]
    pub duration_days: Option<i64>,
}

/// Outcome of a successful issue
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssueReceipt {
    pub log_id: i64,
    pub copy_id: i64,
    pub student_id: i64,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    /// Student counter after the issue
    pub books_issued: i64,
    /// Present when the student went over their category cap
    pub limit_warning: Option<String>,
}

/// Outcome of a successful return
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReturnReceipt {
    pub log_id: i64,
    pub copy_id: i64,
    pub student_id: i64,
    pub returned_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    /// Student counter after the return
    pub books_issued: i64,
}

/// Active loan as offered by the return form
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActiveIssue {
    pub log_id: i64,
    pub copy_id: i64,
    pub title: String,
    pub student_id: i64,
    pub roll_number: String,
    pub student_name: String,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

/// Copy whose availability flag disagrees with the issue log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CopyDrift {
    pub copy_id: i64,
    pub available_status: AvailableStatus,
    pub active_entries: i64,
}

/// Student whose cached counter disagrees with the issue log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CounterDrift {
    pub student_id: i64,
    pub books_issued: i64,
    pub active_entries: i64,
}

/// Consistency check over copies, students and the issue log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuditReport {
    pub copies: Vec<CopyDrift>,
    pub students: Vec<CounterDrift>,
}

impl AuditReport {
    pub fn is_consistent(&self) -> bool {
        self.copies.is_empty() && self.students.is_empty()
    }
}
