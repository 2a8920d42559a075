//! HTTP handlers for the circulation desk

pub mod books;
pub mod health;
pub mod issues;
pub mod lookups;
pub mod openapi;
pub mod reports;
pub mod students;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Home screen
        .route("/dashboard", get(reports::dashboard))
        // Catalog
        .route("/books", get(books::list_books).post(books::add_book))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id/copies", get(books::list_copies).post(books::add_copy))
        .route("/copies/available", get(books::list_available_copies))
        .route("/copies/:id/history", get(issues::copy_history))
        // Roster
        .route("/students", get(students::list_students).post(students::add_student))
        .route("/students/:id", get(students::get_student))
        .route("/students/:id/approval", put(students::set_approval))
        // Circulation
        .route("/issues", post(issues::issue_copy))
        .route("/issues/active", get(issues::list_active))
        .route("/issues/audit", get(issues::audit))
        .route("/issues/:id", get(issues::get_issue))
        .route("/issues/:id/return", post(issues::return_copy))
        // Reports
        .route("/reports/overdue", get(reports::overdue))
        .route("/reports/borrowing-limits", get(reports::borrowing_limits))
        .route("/reports/librarian-performance", get(reports::librarian_performance))
        // Form lookups
        .route("/lookups/book-categories", get(lookups::book_categories))
        .route("/lookups/student-categories", get(lookups::student_categories))
        .route("/lookups/branches", get(lookups::branches))
        .route("/lookups/users", get(lookups::users))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
