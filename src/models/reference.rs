//! Reference data: categories, branches and staff users

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCategory {
    pub id: i64,
    pub name: String,
}

/// Student category with its borrowing cap
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentCategory {
    pub id: i64,
    pub name: String,
    pub max_allowed: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Branch {
    pub id: i64,
    pub name: String,
}

/// Library staff member, used for attribution only
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
}
