//! Circulation service: issuing and returning copies

use chrono::Utc;
use validator::Validate;

use crate::{
    config::CirculationConfig,
    error::{AppError, AppResult},
    models::circulation::{
        ActiveIssue, AuditReport, IssueLogEntry, IssueReceipt, IssueRequest, ReturnReceipt,
        MAX_LOAN_DAYS,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
    config: CirculationConfig,
}

impl CirculationService {
    pub fn new(repository: Repository, config: CirculationConfig) -> Self {
        Self { repository, config }
    }

    /// Issue an available copy to a student
    pub async fn issue_copy(&self, request: IssueRequest) -> AppResult<IssueReceipt> {
        request.validate()?;

        let duration_days = request.duration_days.unwrap_or(self.config.default_loan_days);
        if !(1..=MAX_LOAN_DAYS).contains(&duration_days) {
            return Err(AppError::Validation(format!(
                "Loan duration must be between 1 and {} days, got {}",
                MAX_LOAN_DAYS, duration_days
            )));
        }

        let receipt = self
            .repository
            .issues
            .issue(&request, duration_days, self.config.borrowing_policy, Utc::now())
            .await?;

        if let Some(warning) = &receipt.limit_warning {
            tracing::warn!(
                student_id = receipt.student_id,
                log_id = receipt.log_id,
                "Issued over borrowing cap: {}",
                warning
            );
        }

        tracing::info!(
            log_id = receipt.log_id,
            copy_id = receipt.copy_id,
            student_id = receipt.student_id,
            issued_by = request.issued_by,
            due_at = %receipt.due_at,
            "Copy issued"
        );

        Ok(receipt)
    }

    /// Return the copy held under an active log entry
    pub async fn return_copy(&self, log_id: i64) -> AppResult<ReturnReceipt> {
        let receipt = self.repository.issues.return_copy(log_id, Utc::now()).await?;

        tracing::info!(
            log_id,
            copy_id = receipt.copy_id,
            student_id = receipt.student_id,
            late = receipt.returned_at > receipt.due_at,
            "Copy returned"
        );

        Ok(receipt)
    }

    pub async fn get_issue(&self, log_id: i64) -> AppResult<IssueLogEntry> {
        self.repository.issues.get_by_id(log_id).await
    }

    /// Loans currently out
    pub async fn list_active(&self) -> AppResult<Vec<ActiveIssue>> {
        self.repository.issues.list_active().await
    }

    /// Every loan of a copy, newest first
    pub async fn copy_history(&self, copy_id: i64) -> AppResult<Vec<IssueLogEntry>> {
        self.repository.copies.get_by_id(copy_id).await?;
        self.repository.issues.history_for_copy(copy_id).await
    }

    /// Check copy flags and student counters against the issue log
    pub async fn audit(&self) -> AppResult<AuditReport> {
        let report = self.repository.issues.audit().await?;
        if !report.is_consistent() {
            tracing::warn!(
                copies = report.copies.len(),
                students = report.students.len(),
                "Circulation state drifted from the issue log"
            );
        }
        Ok(report)
    }
}
