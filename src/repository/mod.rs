//! Repository layer for database operations

pub mod books;
pub mod copies;
pub mod issues;
pub mod reference;
pub mod reports;
pub mod students;

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{config::DatabaseConfig, error::AppResult};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Sqlite>,
    pub books: books::BooksRepository,
    pub copies: copies::CopiesRepository,
    pub issues: issues::IssuesRepository,
    pub students: students::StudentsRepository,
    pub reference: reference::ReferenceRepository,
    pub reports: reports::ReportsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            copies: copies::CopiesRepository::new(pool.clone()),
            issues: issues::IssuesRepository::new(pool.clone()),
            students: students::StudentsRepository::new(pool.clone()),
            reference: reference::ReferenceRepository::new(pool.clone()),
            reports: reports::ReportsRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Open a connection pool for the configured database.
///
/// An in-memory database lives only as long as its connection, so it is
/// pinned to a single connection that never expires.
pub async fn connect(config: &DatabaseConfig) -> AppResult<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(&config.url)?.foreign_keys(true);

    let pool = if config.url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_with(options)
            .await?
    };

    Ok(pool)
}

/// Apply pending schema migrations
pub async fn migrate(pool: &Pool<Sqlite>) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
