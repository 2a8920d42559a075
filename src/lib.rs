//! Libdesk - library circulation desk
//!
//! Catalog, student roster, issue/return of physical copies and the
//! operational reports of a library front desk, served as a REST JSON API
//! over a SQLite store.

use std::sync::Arc;

use sqlx::{Pool, Sqlite};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub pool: Pool<Sqlite>,
}

impl AppState {
    /// Wire repositories and services over an open pool
    pub fn new(config: AppConfig, pool: Pool<Sqlite>) -> Self {
        let repository = repository::Repository::new(pool.clone());
        let services = services::Services::new(repository, config.circulation.clone());

        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            pool,
        }
    }
}
