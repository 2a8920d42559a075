//! Copies repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::copy::{AvailableCopy, BookCopy},
};

use super::reference::ensure_exists;

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Sqlite>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<BookCopy> {
        sqlx::query_as::<_, BookCopy>(
            "SELECT id, book_id, available_status, added_by, created_at FROM copies WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CopyNotFound(id))
    }

    /// Copies of a book, oldest first
    pub async fn list_for_book(&self, book_id: i64) -> AppResult<Vec<BookCopy>> {
        let copies = sqlx::query_as::<_, BookCopy>(
            r#"
            SELECT id, book_id, available_status, added_by, created_at
            FROM copies
            WHERE book_id = ?
            ORDER BY id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }

    /// Copies that can be issued right now
    pub async fn list_available(&self) -> AppResult<Vec<AvailableCopy>> {
        let copies = sqlx::query_as::<_, AvailableCopy>(
            r#"
            SELECT c.id AS copy_id, b.id AS book_id, b.title, b.author
            FROM copies c
            JOIN books b ON c.book_id = b.id
            WHERE c.available_status = 1
            ORDER BY b.title, c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }

    /// Register a new physical copy of an existing book
    pub async fn create(&self, book_id: i64, added_by: i64) -> AppResult<BookCopy> {
        let mut tx = self.pool.begin().await?;

        ensure_exists(&mut *tx, "books", "Book", book_id).await?;
        ensure_exists(&mut *tx, "users", "User", added_by).await?;
        let id = insert_copy(&mut *tx, book_id, added_by, Utc::now()).await?;

        tx.commit().await?;

        self.get_by_id(id).await
    }
}

/// Insert an available copy on an open connection
pub(crate) async fn insert_copy(
    conn: &mut SqliteConnection,
    book_id: i64,
    added_by: i64,
    created_at: DateTime<Utc>,
) -> AppResult<i64> {
    let id = sqlx::query(
        "INSERT INTO copies (book_id, available_status, added_by, created_at) VALUES (?, 1, ?, ?)",
    )
    .bind(book_id)
    .bind(added_by)
    .bind(created_at)
    .execute(conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}
