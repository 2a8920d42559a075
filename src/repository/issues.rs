//! Issue log repository: the issue/return state transitions.
//!
//! Every transition runs in one transaction and starts with a conditional
//! write, so the first statement takes the write lock and a concurrent caller
//! sees the committed state:
//!
//! - issue flips `copies.available_status` 1 -> 0 only if it is still 1,
//! - return stamps `issue_log.returned_at` only if it is still NULL, then flips
//!   the copy back 0 -> 1 only if it is still 0.
//!
//! Any failure after the first write drops the transaction, which rolls back.

use chrono::{DateTime, Duration, Utc};
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::circulation::{
        ActiveIssue, AuditReport, BorrowingPolicy, CopyDrift, CounterDrift, IssueLogEntry,
        IssueReceipt, IssueRequest, ReturnReceipt,
    },
};

use super::reference::ensure_exists;

/// Active loans: open log entry on a copy flagged as issued
pub(crate) const ACTIVE_ISSUES_SELECT: &str = r#"
    SELECT l.id AS log_id, l.copy_id, b.title,
           s.id AS student_id, s.roll_number,
           s.first_name || ' ' || s.last_name AS student_name,
           l.issued_at, l.due_at
    FROM issue_log l
    JOIN copies c ON l.copy_id = c.id
    JOIN books b ON c.book_id = b.id
    JOIN students s ON l.student_id = s.id
    WHERE l.returned_at IS NULL AND c.available_status = 0
"#;

#[derive(Clone)]
pub struct IssuesRepository {
    pool: Pool<Sqlite>,
}

impl IssuesRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get log entry by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<IssueLogEntry> {
        sqlx::query_as::<_, IssueLogEntry>(
            r#"
            SELECT id, copy_id, student_id, issued_by, issued_at, due_at, returned_at, logged_at
            FROM issue_log WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::LogEntryNotFound(id))
    }

    /// Full issue history of a copy, newest first
    pub async fn history_for_copy(&self, copy_id: i64) -> AppResult<Vec<IssueLogEntry>> {
        let entries = sqlx::query_as::<_, IssueLogEntry>(
            r#"
            SELECT id, copy_id, student_id, issued_by, issued_at, due_at, returned_at, logged_at
            FROM issue_log
            WHERE copy_id = ?
            ORDER BY id DESC
            "#,
        )
        .bind(copy_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Issue a copy to a student
    pub async fn issue(
        &self,
        request: &IssueRequest,
        duration_days: i64,
        policy: BorrowingPolicy,
        now: DateTime<Utc>,
    ) -> AppResult<IssueReceipt> {
        let mut tx = self.pool.begin().await?;

        let flipped = sqlx::query(
            "UPDATE copies SET available_status = 0 WHERE id = ? AND available_status = 1",
        )
        .bind(request.copy_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if flipped == 0 {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM copies WHERE id = ?")
                .bind(request.copy_id)
                .fetch_optional(&mut *tx)
                .await?;
            return Err(match exists {
                Some(_) => AppError::CopyUnavailable(request.copy_id),
                None => AppError::CopyNotFound(request.copy_id),
            });
        }

        let (books_issued, max_allowed) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT s.books_issued, c.max_allowed
            FROM students s
            JOIN student_categories c ON s.category_id = c.id
            WHERE s.id = ?
            "#,
        )
        .bind(request.student_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::StudentNotFound(request.student_id))?;

        ensure_exists(&mut *tx, "users", "User", request.issued_by).await?;

        let limit_warning = check_borrowing_cap(policy, request.student_id, books_issued, max_allowed)?;

        let due_at = now + Duration::days(duration_days);

        let log_id = sqlx::query(
            r#"
            INSERT INTO issue_log (copy_id, student_id, issued_by, issued_at, due_at, logged_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.copy_id)
        .bind(request.student_id)
        .bind(request.issued_by)
        .bind(now)
        .bind(due_at)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query("UPDATE students SET books_issued = books_issued + 1 WHERE id = ?")
            .bind(request.student_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(IssueReceipt {
            log_id,
            copy_id: request.copy_id,
            student_id: request.student_id,
            issued_at: now,
            due_at,
            books_issued: books_issued + 1,
            limit_warning,
        })
    }

    /// Return the copy held under an active log entry
    pub async fn return_copy(&self, log_id: i64, now: DateTime<Utc>) -> AppResult<ReturnReceipt> {
        let mut tx = self.pool.begin().await?;

        let closed = sqlx::query_as::<_, (i64, i64, DateTime<Utc>)>(
            r#"
            UPDATE issue_log SET returned_at = ?
            WHERE id = ? AND returned_at IS NULL
            RETURNING copy_id, student_id, due_at
            "#,
        )
        .bind(now)
        .bind(log_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (copy_id, student_id, due_at) = match closed {
            Some(row) => row,
            None => {
                let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM issue_log WHERE id = ?")
                    .bind(log_id)
                    .fetch_optional(&mut *tx)
                    .await?;
                return Err(match exists {
                    Some(_) => AppError::AlreadyReturned(log_id),
                    None => AppError::LogEntryNotFound(log_id),
                });
            }
        };

        let flipped = sqlx::query(
            "UPDATE copies SET available_status = 1 WHERE id = ? AND available_status = 0",
        )
        .bind(copy_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if flipped == 0 {
            tracing::warn!(log_id, copy_id, "Active log entry points at a copy that is not issued");
            return Err(AppError::AlreadyReturned(log_id));
        }

        sqlx::query("UPDATE students SET books_issued = MAX(books_issued - 1, 0) WHERE id = ?")
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        let books_issued: i64 = sqlx::query_scalar("SELECT books_issued FROM students WHERE id = ?")
            .bind(student_id)
            .fetch_optional(&mut *tx)
            .await?
            .unwrap_or(0);

        tx.commit().await?;

        Ok(ReturnReceipt {
            log_id,
            copy_id,
            student_id,
            returned_at: now,
            due_at,
            books_issued,
        })
    }

    /// Active loans, most urgent first
    pub async fn list_active(&self) -> AppResult<Vec<ActiveIssue>> {
        let mut rows = sqlx::query_as::<_, ActiveIssue>(ACTIVE_ISSUES_SELECT)
            .fetch_all(&self.pool)
            .await?;

        rows.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(a.log_id.cmp(&b.log_id)));
        Ok(rows)
    }

    /// Compare copy flags and student counters with the active log entries
    pub async fn audit(&self) -> AppResult<AuditReport> {
        let copies = sqlx::query_as::<_, CopyDrift>(
            r#"
            SELECT c.id AS copy_id, c.available_status, COUNT(l.id) AS active_entries
            FROM copies c
            LEFT JOIN issue_log l ON l.copy_id = c.id AND l.returned_at IS NULL
            GROUP BY c.id, c.available_status
            HAVING (c.available_status = 0 AND COUNT(l.id) <> 1)
                OR (c.available_status = 1 AND COUNT(l.id) <> 0)
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let students = sqlx::query_as::<_, CounterDrift>(
            r#"
            SELECT s.id AS student_id, s.books_issued, COUNT(l.id) AS active_entries
            FROM students s
            LEFT JOIN issue_log l ON l.student_id = s.id AND l.returned_at IS NULL
            GROUP BY s.id, s.books_issued
            HAVING s.books_issued <> COUNT(l.id)
            ORDER BY s.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(AuditReport { copies, students })
    }
}

/// Apply the borrowing policy to a student holding `books_issued` copies.
///
/// Returns the warning to attach to the receipt, if any.
fn check_borrowing_cap(
    policy: BorrowingPolicy,
    student_id: i64,
    books_issued: i64,
    max_allowed: i64,
) -> AppResult<Option<String>> {
    if policy == BorrowingPolicy::Ignore || books_issued < max_allowed {
        return Ok(None);
    }

    let message = format!(
        "student {} already holds {} of {} allowed copies",
        student_id, books_issued, max_allowed
    );

    match policy {
        BorrowingPolicy::Enforce => Err(AppError::BorrowingLimit(message)),
        _ => Ok(Some(message)),
    }
}
