//! Reference data repository (categories, branches, staff)

use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::reference::{BookCategory, Branch, StudentCategory, User},
};

#[derive(Clone)]
pub struct ReferenceRepository {
    pool: Pool<Sqlite>,
}

impl ReferenceRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn book_categories(&self) -> AppResult<Vec<BookCategory>> {
        let rows = sqlx::query_as::<_, BookCategory>("SELECT id, name FROM book_categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn student_categories(&self) -> AppResult<Vec<StudentCategory>> {
        let rows = sqlx::query_as::<_, StudentCategory>(
            "SELECT id, name, max_allowed FROM student_categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn branches(&self) -> AppResult<Vec<Branch>> {
        let rows = sqlx::query_as::<_, Branch>("SELECT id, name FROM branches ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>("SELECT id, name FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Fail with `NotFound` unless `id` exists in `table`.
///
/// `table` is always one of our own table names, never user input.
pub(crate) async fn ensure_exists(
    conn: &mut SqliteConnection,
    table: &'static str,
    label: &str,
    id: i64,
) -> AppResult<()> {
    let query = format!("SELECT id FROM {} WHERE id = ?", table);
    let found: Option<i64> = sqlx::query_scalar(&query)
        .bind(id)
        .fetch_optional(conn)
        .await?;

    match found {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!("{} with id {} not found", label, id))),
    }
}
