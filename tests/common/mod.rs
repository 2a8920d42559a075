//! Shared fixtures: an in-memory store with the reference data migrated in
#![allow(dead_code)]

use libdesk_server::{
    config::{CirculationConfig, DatabaseConfig},
    models::{
        book::NewBook,
        circulation::{BorrowingPolicy, IssueRequest},
        student::NewStudent,
    },
    repository::{self, Repository},
    services::Services,
};
use sqlx::{Pool, Sqlite};

/// Seeded "Head Librarian"
pub const LIBRARIAN: i64 = 1;
/// Seeded book category "Fiction"
pub const FICTION: i64 = 1;
/// Seeded student category "Undergraduate" (max 5)
pub const UNDERGRADUATE: i64 = 1;
/// Seeded student category "Postgraduate" (max 8)
pub const POSTGRADUATE: i64 = 2;
/// Seeded branch "Computer Science"
pub const COMPUTER_SCIENCE: i64 = 1;

pub async fn memory_pool() -> Pool<Sqlite> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let pool = repository::connect(&config).await.expect("open in-memory database");
    repository::migrate(&pool).await.expect("run migrations");
    pool
}

pub fn services(pool: &Pool<Sqlite>, policy: BorrowingPolicy) -> Services {
    Services::new(
        Repository::new(pool.clone()),
        CirculationConfig {
            default_loan_days: 14,
            borrowing_policy: policy,
        },
    )
}

pub fn new_book(title: &str, author: &str) -> NewBook {
    NewBook {
        title: title.to_string(),
        author: author.to_string(),
        description: None,
        category_id: FICTION,
        added_by: LIBRARIAN,
        with_copy: true,
    }
}

/// Catalogue a book with one copy, returning (book_id, copy_id)
pub async fn add_book(services: &Services, title: &str, author: &str) -> (i64, i64) {
    let created = services
        .catalog
        .add_book(new_book(title, author))
        .await
        .expect("add book");
    (created.book.id, created.copy_id.expect("copy provisioned"))
}

pub fn new_student(roll_number: &str, category_id: i64) -> NewStudent {
    NewStudent {
        roll_number: roll_number.to_string(),
        first_name: "Test".to_string(),
        last_name: roll_number.to_string(),
        email: None,
        category_id,
        branch_id: COMPUTER_SCIENCE,
        year: 2026,
    }
}

pub async fn add_student(services: &Services, roll_number: &str, category_id: i64) -> i64 {
    services
        .roster
        .add_student(new_student(roll_number, category_id))
        .await
        .expect("add student")
        .id
}

pub fn issue(copy_id: i64, student_id: i64) -> IssueRequest {
    IssueRequest {
        copy_id,
        student_id,
        issued_by: LIBRARIAN,
        duration_days: Some(14),
    }
}

/// Number of active log entries held by a student
pub async fn active_loans(pool: &Pool<Sqlite>, student_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM issue_log WHERE student_id = ? AND returned_at IS NULL")
        .bind(student_id)
        .fetch_one(pool)
        .await
        .expect("count active loans")
}
