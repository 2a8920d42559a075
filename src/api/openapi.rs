//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, issues, lookups, reports, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libdesk API",
        version = "0.1.0",
        description = "Library circulation desk REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        books::list_books,
        books::get_book,
        books::add_book,
        books::list_copies,
        books::add_copy,
        books::list_available_copies,
        // Roster
        students::list_students,
        students::get_student,
        students::add_student,
        students::set_approval,
        // Circulation
        issues::issue_copy,
        issues::return_copy,
        issues::get_issue,
        issues::list_active,
        issues::copy_history,
        issues::audit,
        // Reports
        reports::dashboard,
        reports::overdue,
        reports::borrowing_limits,
        reports::librarian_performance,
        // Lookups
        lookups::book_categories,
        lookups::student_categories,
        lookups::branches,
        lookups::users,
    ),
    components(
        schemas(
            // Catalog
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookQuery,
            crate::models::book::NewBook,
            crate::models::book::BookCreated,
            crate::models::copy::BookCopy,
            crate::models::copy::AvailableCopy,
            crate::models::copy::AvailableStatus,
            crate::models::copy::NewCopy,
            // Roster
            crate::models::student::Student,
            crate::models::student::StudentStatus,
            crate::models::student::NewStudent,
            crate::models::student::ApprovalDecision,
            crate::models::student::UpdateApproval,
            // Circulation
            crate::models::circulation::IssueRequest,
            crate::models::circulation::IssueReceipt,
            crate::models::circulation::ReturnReceipt,
            crate::models::circulation::IssueLogEntry,
            crate::models::circulation::ActiveIssue,
            crate::models::circulation::AuditReport,
            crate::models::circulation::CopyDrift,
            crate::models::circulation::CounterDrift,
            crate::models::circulation::BorrowingPolicy,
            // Reports
            crate::models::report::DashboardSummary,
            crate::models::report::OverdueEntry,
            crate::models::report::BorrowingLimitRow,
            crate::models::report::LibrarianPerformanceRow,
            // Lookups
            crate::models::reference::BookCategory,
            crate::models::reference::StudentCategory,
            crate::models::reference::Branch,
            crate::models::reference::User,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Catalog and copies"),
        (name = "students", description = "Student roster"),
        (name = "issues", description = "Issue and return of copies"),
        (name = "reports", description = "Dashboard and reports"),
        (name = "lookups", description = "Reference lists for forms")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
