//! Book (catalog record) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::non_blank;

/// Book record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub category_id: i64,
    /// User who catalogued the book
    pub added_by: i64,
    pub created_at: DateTime<Utc>,
}

/// Book row for the catalog listing, with copy counters
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category_id: i64,
    pub category: String,
    pub nb_copies: i64,
    pub nb_available: i64,
}

/// Catalog search parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring matched against title or author
    pub search: Option<String>,
}

/// Add book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub added_by: i64,
    /// Also register one physical copy of the book
    #[serde(default)]
    pub with_copy: bool,
}

impl NewBook {
    /// Trim text fields so blank input fails validation; a blank description becomes `None`
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            description: non_blank(self.description),
            ..self
        }
    }
}

/// Result of adding a book
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookCreated {
    pub book: Book,
    /// Copy provisioned alongside the book, if requested
    pub copy_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_fails_after_normalizing() {
        let book = NewBook {
            title: "   ".into(),
            author: " Orwell ".into(),
            description: Some("  ".into()),
            category_id: 1,
            added_by: 1,
            with_copy: false,
        }
        .normalized();

        assert_eq!(book.author, "Orwell");
        assert!(book.description.is_none());
        assert!(book.validate().unwrap_err().field_errors().contains_key("title"));
    }
}
