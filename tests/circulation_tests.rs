//! Issue/return state transitions and the copy/counter invariants

mod common;

use chrono::Duration;
use libdesk_server::{
    config::{CirculationConfig, DatabaseConfig},
    error::{AppError, ErrorKind},
    models::{circulation::BorrowingPolicy, copy::AvailableStatus},
    repository::{self, Repository},
    services::Services,
};

use common::*;

#[tokio::test]
async fn issue_marks_copy_issued_and_bumps_counter() {
    let pool = memory_pool().await;
    let services = services(&pool, BorrowingPolicy::Ignore);
    let repo = Repository::new(pool.clone());

    for i in 1..=6 {
        add_book(&services, &format!("Filler {}", i), "Anonymous").await;
    }
    let (_, copy_id) = add_book(&services, "1984", "George Orwell").await;
    assert_eq!(copy_id, 7);

    for roll in ["UG-001", "UG-002", "UG-003"] {
        add_student(&services, roll, UNDERGRADUATE).await;
    }
    assert_eq!(services.roster.get_student(3).await.unwrap().books_issued, 0);

    let receipt = services.circulation.issue_copy(issue(7, 3)).await.unwrap();
    assert_eq!(receipt.copy_id, 7);
    assert_eq!(receipt.student_id, 3);
    assert_eq!(receipt.books_issued, 1);
    assert!(receipt.limit_warning.is_none());

    let copy = repo.copies.get_by_id(7).await.unwrap();
    assert_eq!(copy.available_status, AvailableStatus::Issued);
    assert_eq!(services.roster.get_student(3).await.unwrap().books_issued, 1);

    let entry = services.circulation.get_issue(receipt.log_id).await.unwrap();
    assert!(entry.is_active());
    assert_eq!(entry.issued_by, LIBRARIAN);
    assert_eq!(entry.due_at - entry.issued_at, Duration::days(14));

    let second = services.circulation.issue_copy(issue(7, 3)).await;
    let err = second.unwrap_err();
    assert!(matches!(err, AppError::CopyUnavailable(7)));
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(services.roster.get_student(3).await.unwrap().books_issued, 1);
}

#[tokio::test]
async fn return_restores_copy_and_counter() {
    let pool = memory_pool().await;
    let services = services(&pool, BorrowingPolicy::Ignore);
    let repo = Repository::new(pool.clone());

    let (_, copy_id) = add_book(&services, "1984", "George Orwell").await;
    let student_id = add_student(&services, "UG-001", UNDERGRADUATE).await;
    let issued = services.circulation.issue_copy(issue(copy_id, student_id)).await.unwrap();

    let returned = services.circulation.return_copy(issued.log_id).await.unwrap();
    assert_eq!(returned.copy_id, copy_id);
    assert_eq!(returned.student_id, student_id);
    assert_eq!(returned.books_issued, 0);

    let copy = repo.copies.get_by_id(copy_id).await.unwrap();
    assert_eq!(copy.available_status, AvailableStatus::Available);
    assert_eq!(services.roster.get_student(student_id).await.unwrap().books_issued, 0);

    let entry = services.circulation.get_issue(issued.log_id).await.unwrap();
    assert!(!entry.is_active());
}

#[tokio::test]
async fn stale_return_is_rejected() {
    let pool = memory_pool().await;
    let services = services(&pool, BorrowingPolicy::Ignore);

    let (_, copy_id) = add_book(&services, "1984", "George Orwell").await;
    let student_id = add_student(&services, "UG-001", UNDERGRADUATE).await;
    let issued = services.circulation.issue_copy(issue(copy_id, student_id)).await.unwrap();
    services.circulation.return_copy(issued.log_id).await.unwrap();

    let err = services.circulation.return_copy(issued.log_id).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyReturned(id) if id == issued.log_id));
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(services.roster.get_student(student_id).await.unwrap().books_issued, 0);

    let err = services.circulation.return_copy(4242).await.unwrap_err();
    assert!(matches!(err, AppError::LogEntryNotFound(4242)));
}

#[tokio::test]
async fn reissued_copy_keeps_history_and_old_entry_stays_closed() {
    let pool = memory_pool().await;
    let services = services(&pool, BorrowingPolicy::Ignore);

    let (_, copy_id) = add_book(&services, "Dune", "Frank Herbert").await;
    let first_student = add_student(&services, "UG-001", UNDERGRADUATE).await;
    let second_student = add_student(&services, "UG-002", UNDERGRADUATE).await;

    let first = services.circulation.issue_copy(issue(copy_id, first_student)).await.unwrap();
    services.circulation.return_copy(first.log_id).await.unwrap();
    let second = services.circulation.issue_copy(issue(copy_id, second_student)).await.unwrap();

    let history = services.circulation.copy_history(copy_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.log_id);
    assert!(history[0].is_active());
    assert!(!history[1].is_active());

    // Returning the old entry must not release the second loan
    let err = services.circulation.return_copy(first.log_id).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyReturned(_)));
    assert_eq!(services.roster.get_student(second_student).await.unwrap().books_issued, 1);

    let active = services.circulation.list_active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].log_id, second.log_id);
    assert_eq!(active[0].student_id, second_student);
}

#[tokio::test]
async fn failed_issue_leaves_store_untouched() {
    let pool = memory_pool().await;
    let services = services(&pool, BorrowingPolicy::Ignore);
    let repo = Repository::new(pool.clone());

    let (_, copy_id) = add_book(&services, "1984", "George Orwell").await;
    let student_id = add_student(&services, "UG-001", UNDERGRADUATE).await;

    let err = services.circulation.issue_copy(issue(copy_id, 999)).await.unwrap_err();
    assert!(matches!(err, AppError::StudentNotFound(999)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        repo.copies.get_by_id(copy_id).await.unwrap().available_status,
        AvailableStatus::Available
    );

    let mut request = issue(copy_id, student_id);
    request.issued_by = 77;
    let err = services.circulation.issue_copy(request).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(
        repo.copies.get_by_id(copy_id).await.unwrap().available_status,
        AvailableStatus::Available
    );
    assert_eq!(services.roster.get_student(student_id).await.unwrap().books_issued, 0);
    assert!(services.circulation.copy_history(copy_id).await.unwrap().is_empty());

    let err = services.circulation.issue_copy(issue(555, student_id)).await.unwrap_err();
    assert!(matches!(err, AppError::CopyNotFound(555)));
}

#[tokio::test]
async fn duration_must_be_positive() {
    let pool = memory_pool().await;
    let services = services(&pool, BorrowingPolicy::Ignore);

    let (_, copy_id) = add_book(&services, "1984", "George Orwell").await;
    let student_id = add_student(&services, "UG-001", UNDERGRADUATE).await;

    let mut request = issue(copy_id, student_id);
    request.duration_days = Some(0);
    let err = services.circulation.issue_copy(request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let mut request = issue(copy_id, student_id);
    request.duration_days = None;
    let receipt = services.circulation.issue_copy(request).await.unwrap();
    assert_eq!(receipt.due_at - receipt.issued_at, Duration::days(14));
}

#[tokio::test]
async fn oversized_default_duration_is_rejected() {
    let pool = memory_pool().await;
    let services = Services::new(
        Repository::new(pool.clone()),
        CirculationConfig {
            default_loan_days: 200_000_000,
            borrowing_policy: BorrowingPolicy::Ignore,
        },
    );
    let repo = Repository::new(pool.clone());

    let (_, copy_id) = add_book(&services, "1984", "George Orwell").await;
    let student_id = add_student(&services, "UG-001", UNDERGRADUATE).await;

    let mut request = issue(copy_id, student_id);
    request.duration_days = None;
    let err = services.circulation.issue_copy(request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        repo.copies.get_by_id(copy_id).await.unwrap().available_status,
        AvailableStatus::Available
    );
    assert!(services.circulation.copy_history(copy_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn counters_match_active_loans_after_mixed_traffic() {
    let pool = memory_pool().await;
    let services = services(&pool, BorrowingPolicy::Ignore);

    let mut copies = Vec::new();
    for i in 0..6 {
        copies.push(add_book(&services, &format!("Title {}", i), "Author").await.1);
    }
    let students = [
        add_student(&services, "UG-001", UNDERGRADUATE).await,
        add_student(&services, "UG-002", UNDERGRADUATE).await,
        add_student(&services, "PG-001", POSTGRADUATE).await,
    ];

    let mut open = Vec::new();
    for (i, copy_id) in copies.iter().enumerate() {
        let student_id = students[i % students.len()];
        open.push(services.circulation.issue_copy(issue(*copy_id, student_id)).await.unwrap());
    }

    // Double issue and double return attempts along the way
    assert!(services.circulation.issue_copy(issue(copies[0], students[1])).await.is_err());
    services.circulation.return_copy(open[1].log_id).await.unwrap();
    assert!(services.circulation.return_copy(open[1].log_id).await.is_err());
    services.circulation.return_copy(open[3].log_id).await.unwrap();
    services.circulation.issue_copy(issue(copies[1], students[2])).await.unwrap();

    for student_id in students {
        let student = services.roster.get_student(student_id).await.unwrap();
        assert!(student.books_issued >= 0);
        assert_eq!(student.books_issued, active_loans(&pool, student_id).await);
    }

    let audit = services.circulation.audit().await.unwrap();
    assert!(audit.is_consistent(), "unexpected drift: {:?}", audit);
}

#[tokio::test]
async fn counter_never_goes_negative_after_drift() {
    let pool = memory_pool().await;
    let services = services(&pool, BorrowingPolicy::Ignore);

    let (_, copy_id) = add_book(&services, "1984", "George Orwell").await;
    let student_id = add_student(&services, "UG-001", UNDERGRADUATE).await;
    let issued = services.circulation.issue_copy(issue(copy_id, student_id)).await.unwrap();

    sqlx::query("UPDATE students SET books_issued = 0 WHERE id = ?")
        .bind(student_id)
        .execute(&pool)
        .await
        .unwrap();

    let audit = services.circulation.audit().await.unwrap();
    assert_eq!(audit.students.len(), 1);
    assert_eq!(audit.students[0].student_id, student_id);
    assert_eq!(audit.students[0].active_entries, 1);

    let returned = services.circulation.return_copy(issued.log_id).await.unwrap();
    assert_eq!(returned.books_issued, 0);
    assert_eq!(services.roster.get_student(student_id).await.unwrap().books_issued, 0);
}

#[tokio::test]
async fn return_rolls_back_when_copy_flag_disagrees() {
    let pool = memory_pool().await;
    let services = services(&pool, BorrowingPolicy::Ignore);

    let (_, copy_id) = add_book(&services, "1984", "George Orwell").await;
    let student_id = add_student(&services, "UG-001", UNDERGRADUATE).await;
    let issued = services.circulation.issue_copy(issue(copy_id, student_id)).await.unwrap();

    sqlx::query("UPDATE copies SET available_status = 1 WHERE id = ?")
        .bind(copy_id)
        .execute(&pool)
        .await
        .unwrap();

    let audit = services.circulation.audit().await.unwrap();
    assert_eq!(audit.copies.len(), 1);
    assert_eq!(audit.copies[0].copy_id, copy_id);
    assert_eq!(audit.copies[0].available_status, AvailableStatus::Available);
    assert_eq!(audit.copies[0].active_entries, 1);

    let err = services.circulation.return_copy(issued.log_id).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyReturned(_)));

    // Nothing from the failed return is visible
    assert!(services.circulation.get_issue(issued.log_id).await.unwrap().is_active());
    assert_eq!(services.roster.get_student(student_id).await.unwrap().books_issued, 1);
}

#[tokio::test]
async fn over_cap_issue_follows_policy() {
    let pool = memory_pool().await;
    let ignore = services(&pool, BorrowingPolicy::Ignore);
    let advise = services(&pool, BorrowingPolicy::Advise);
    let enforce = services(&pool, BorrowingPolicy::Enforce);
    let repo = Repository::new(pool.clone());

    let student_id = add_student(&ignore, "UG-001", UNDERGRADUATE).await;
    let mut copies = Vec::new();
    for i in 0..8 {
        copies.push(add_book(&ignore, &format!("Title {}", i), "Author").await.1);
    }

    for copy_id in &copies[..5] {
        ignore.circulation.issue_copy(issue(*copy_id, student_id)).await.unwrap();
    }

    let err = enforce.circulation.issue_copy(issue(copies[5], student_id)).await.unwrap_err();
    assert!(matches!(err, AppError::BorrowingLimit(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(
        repo.copies.get_by_id(copies[5]).await.unwrap().available_status,
        AvailableStatus::Available
    );
    assert_eq!(ignore.roster.get_student(student_id).await.unwrap().books_issued, 5);

    let advised = advise.circulation.issue_copy(issue(copies[5], student_id)).await.unwrap();
    assert!(advised.limit_warning.is_some());
    assert_eq!(advised.books_issued, 6);

    let ignored = ignore.circulation.issue_copy(issue(copies[6], student_id)).await.unwrap();
    assert!(ignored.limit_warning.is_none());
    assert_eq!(ignored.books_issued, 7);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_issues_of_one_copy_have_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.path().join("desk.db").display()),
        max_connections: 4,
        min_connections: 1,
    };
    let pool = repository::connect(&config).await.unwrap();
    repository::migrate(&pool).await.unwrap();
    let services = services(&pool, BorrowingPolicy::Ignore);

    let (_, copy_id) = add_book(&services, "1984", "George Orwell").await;
    let alice = add_student(&services, "UG-001", UNDERGRADUATE).await;
    let bob = add_student(&services, "UG-002", UNDERGRADUATE).await;

    let (first, second) = tokio::join!(
        services.circulation.issue_copy(issue(copy_id, alice)),
        services.circulation.issue_copy(issue(copy_id, bob)),
    );

    let outcomes = [first, second];
    let winners = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(AppError::CopyUnavailable(id)) if *id == copy_id)));

    let total: i64 = active_loans(&pool, alice).await + active_loans(&pool, bob).await;
    assert_eq!(total, 1);
    assert!(services.circulation.audit().await.unwrap().is_consistent());
}
