//! Physical copy model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Availability of a copy, stored as 1 (available) / 0 (issued)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum AvailableStatus {
    Issued = 0,
    Available = 1,
}

/// Copy record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCopy {
    pub id: i64,
    pub book_id: i64,
    pub available_status: AvailableStatus,
    pub added_by: i64,
    pub created_at: DateTime<Utc>,
}

/// Copy available for issue, as offered by the issue form
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AvailableCopy {
    pub copy_id: i64,
    pub book_id: i64,
    pub title: String,
    pub author: String,
}

/// Add copy request
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewCopy {
    pub added_by: i64,
}
