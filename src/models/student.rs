//! Student model and approval status

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::non_blank;

/// Registration status derived from the approved/rejected flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum StudentStatus {
    Pending,
    Approved,
    Rejected,
}

impl StudentStatus {
    /// Approved wins over rejected if both flags are somehow set
    pub fn from_flags(approved: bool, rejected: bool) -> Self {
        if approved {
            StudentStatus::Approved
        } else if rejected {
            StudentStatus::Rejected
        } else {
            StudentStatus::Pending
        }
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StudentStatus::Pending => "Pending",
            StudentStatus::Approved => "Approved",
            StudentStatus::Rejected => "Rejected",
        };
        write!(f, "{}", label)
    }
}

/// Student row joined with category and branch names
#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub id: i64,
    pub roll_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub category_id: i64,
    pub category: String,
    pub max_allowed: i64,
    pub branch_id: i64,
    pub branch: String,
    pub year: i64,
    pub books_issued: i64,
    pub approved: bool,
    pub rejected: bool,
}

/// Student as listed on the roster
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Student {
    pub id: i64,
    pub roll_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub category_id: i64,
    pub category: String,
    /// Borrowing cap of the student's category
    pub max_allowed: i64,
    pub branch_id: i64,
    pub branch: String,
    pub year: i64,
    /// Cached count of copies currently issued
    pub books_issued: i64,
    pub status: StudentStatus,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Self {
            status: StudentStatus::from_flags(row.approved, row.rejected),
            id: row.id,
            roll_number: row.roll_number,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            category_id: row.category_id,
            category: row.category,
            max_allowed: row.max_allowed,
            branch_id: row.branch_id,
            branch: row.branch,
            year: row.year,
            books_issued: row.books_issued,
        }
    }
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Register student request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewStudent {
    #[validate(length(min = 1, message = "Roll number is required"))]
    pub roll_number: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub category_id: i64,
    pub branch_id: i64,
    #[validate(range(min = 1900, max = 2100, message = "Year must be between 1900 and 2100"))]
    pub year: i64,
}

impl NewStudent {
    /// Trim text fields before validation; a blank email becomes `None`
    pub fn normalized(self) -> Self {
        Self {
            roll_number: self.roll_number.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: non_blank(self.email),
            ..self
        }
    }
}

/// Librarian decision on a pending registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalDecision {
    Approve,
    Reject,
    /// Put the student back to pending
    Reset,
}

impl ApprovalDecision {
    /// (approved, rejected) flags written for this decision
    pub fn flags(self) -> (bool, bool) {
        match self {
            ApprovalDecision::Approve => (true, false),
            ApprovalDecision::Reject => (false, true),
            ApprovalDecision::Reset => (false, false),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateApproval {
    pub decision: ApprovalDecision,
}
