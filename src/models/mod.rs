//! Data models for the circulation desk

pub mod book;
pub mod circulation;
pub mod copy;
pub mod reference;
pub mod report;
pub mod student;

// Re-export commonly used types
pub use book::{Book, NewBook};
pub use circulation::{BorrowingPolicy, IssueLogEntry, IssueReceipt, ReturnReceipt};
pub use copy::{AvailableStatus, BookCopy};
pub use student::{Student, StudentStatus};

/// Trimmed value, or `None` when nothing is left
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
