//! Reporting service

use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::report::{BorrowingLimitRow, DashboardSummary, LibrarianPerformanceRow, OverdueEntry},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn dashboard(&self) -> AppResult<DashboardSummary> {
        self.repository.reports.dashboard().await
    }

    /// Overdue loans as of now
    pub async fn overdue(&self) -> AppResult<Vec<OverdueEntry>> {
        self.overdue_at(Utc::now()).await
    }

    /// Overdue loans as of a given instant
    pub async fn overdue_at(&self, as_of: DateTime<Utc>) -> AppResult<Vec<OverdueEntry>> {
        self.repository.reports.overdue(as_of).await
    }

    pub async fn borrowing_limits(&self) -> AppResult<Vec<BorrowingLimitRow>> {
        self.repository.reports.borrowing_limits().await
    }

    pub async fn librarian_performance(&self) -> AppResult<Vec<LibrarianPerformanceRow>> {
        self.repository.reports.librarian_performance().await
    }
}
