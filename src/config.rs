//! Configuration management for the circulation desk

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::models::circulation::{BorrowingPolicy, MAX_LOAN_DAYS};

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CirculationConfig {
    /// Loan length used when an issue request does not give one
    pub default_loan_days: i64,
    /// What to do when a student is at their category cap
    pub borrowing_policy: BorrowingPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub circulation: CirculationConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // LIBDESK_CIRCULATION__BORROWING_POLICY=enforce
            .add_source(
                Environment::with_prefix("LIBDESK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later, at issue time
    pub fn validate(&self) -> Result<(), ConfigError> {
        let days = self.circulation.default_loan_days;
        if !(1..=MAX_LOAN_DAYS).contains(&days) {
            return Err(ConfigError::Message(format!(
                "circulation.default_loan_days must be between 1 and {}, got {}",
                MAX_LOAN_DAYS, days
            )));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://libdesk.db?mode=rwc".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for CirculationConfig {
    fn default() -> Self {
        Self {
            default_loan_days: 14,
            borrowing_policy: BorrowingPolicy::Ignore,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            circulation: CirculationConfig::default(),
        }
    }
}
