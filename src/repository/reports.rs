//! Read-only reporting queries

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use super::issues::ACTIVE_ISSUES_SELECT;
use crate::{
    error::AppResult,
    models::{
        circulation::ActiveIssue,
        report::{BorrowingLimitRow, DashboardSummary, LibrarianPerformanceRow, OverdueEntry},
    },
};

#[derive(Clone)]
pub struct ReportsRepository {
    pool: Pool<Sqlite>,
}

impl ReportsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Home screen counters
    pub async fn dashboard(&self) -> AppResult<DashboardSummary> {
        let (total_books, total_students, available_copies) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT (SELECT COUNT(*) FROM books),
                   (SELECT COUNT(*) FROM students),
                   (SELECT COUNT(*) FROM copies WHERE available_status = 1)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardSummary {
            total_books,
            total_students,
            available_copies,
        })
    }

    /// Active loans whose due date is before `as_of`, most overdue first
    pub async fn overdue(&self, as_of: DateTime<Utc>) -> AppResult<Vec<OverdueEntry>> {
        let active = sqlx::query_as::<_, ActiveIssue>(ACTIVE_ISSUES_SELECT)
            .fetch_all(&self.pool)
            .await?;

        // Timestamps are stored as text, so the cut-off is applied here
        let mut rows: Vec<OverdueEntry> = active
            .into_iter()
            .filter(|issue| issue.due_at < as_of)
            .map(|issue| OverdueEntry {
                days_overdue: OverdueEntry::days_between(issue.due_at, as_of),
                log_id: issue.log_id,
                title: issue.title,
                roll_number: issue.roll_number,
                student_name: issue.student_name,
                issued_at: issue.issued_at,
                due_at: issue.due_at,
            })
            .collect();

        rows.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(a.log_id.cmp(&b.log_id)));
        Ok(rows)
    }

    /// Per student category: students, and students at or over the cap
    pub async fn borrowing_limits(&self) -> AppResult<Vec<BorrowingLimitRow>> {
        let rows = sqlx::query_as::<_, BorrowingLimitRow>(
            r#"
            SELECT c.name AS category, c.max_allowed,
                   COUNT(s.id) AS total_students,
                   COALESCE(SUM(CASE WHEN s.books_issued >= c.max_allowed THEN 1 ELSE 0 END), 0)
                       AS exceeded_limit
            FROM student_categories c
            LEFT JOIN students s ON s.category_id = c.id
            GROUP BY c.id, c.name, c.max_allowed
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Per librarian: loans issued in total and loans still out
    pub async fn librarian_performance(&self) -> AppResult<Vec<LibrarianPerformanceRow>> {
        let rows = sqlx::query_as::<_, LibrarianPerformanceRow>(
            r#"
            SELECT u.id AS user_id, u.name AS librarian,
                   COUNT(l.id) AS total_issued,
                   COALESCE(SUM(CASE
                       WHEN l.id IS NOT NULL AND l.returned_at IS NULL AND c.available_status = 0
                       THEN 1 ELSE 0 END), 0) AS currently_borrowed
            FROM users u
            LEFT JOIN issue_log l ON l.issued_by = u.id
            LEFT JOIN copies c ON l.copy_id = c.id
            GROUP BY u.id, u.name
            ORDER BY u.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
