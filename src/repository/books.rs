//! Books repository for catalog operations

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookCreated, BookSummary, NewBook},
};

use super::{copies::insert_copy, reference::ensure_exists};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author, description, category_id, added_by, created_at
            FROM books WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List books, optionally restricted to a title/author substring.
    ///
    /// SQLite only folds ASCII case, so matching is done here on
    /// lowercased text.
    pub async fn search(&self, term: Option<&str>) -> AppResult<Vec<BookSummary>> {
        let needle = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        let books = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT b.id, b.title, b.author, b.category_id, bc.name AS category,
                   COUNT(c.id) AS nb_copies,
                   COALESCE(SUM(CASE WHEN c.available_status = 1 THEN 1 ELSE 0 END), 0) AS nb_available
            FROM books b
            JOIN book_categories bc ON b.category_id = bc.id
            LEFT JOIN copies c ON c.book_id = b.id
            GROUP BY b.id, b.title, b.author, b.category_id, bc.name
            ORDER BY b.title, b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(match needle {
            Some(needle) => books
                .into_iter()
                .filter(|book| matches_term(book, &needle))
                .collect(),
            None => books,
        })
    }

    /// Insert a book, and optionally its first copy, in one transaction
    pub async fn create(&self, book: &NewBook) -> AppResult<BookCreated> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        ensure_exists(&mut *tx, "book_categories", "Book category", book.category_id).await?;
        ensure_exists(&mut *tx, "users", "User", book.added_by).await?;

        let id = sqlx::query(
            r#"
            INSERT INTO books (title, author, description, category_id, added_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(book.category_id)
        .bind(book.added_by)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let copy_id = if book.with_copy {
            Some(insert_copy(&mut *tx, id, book.added_by, now).await?)
        } else {
            None
        };

        tx.commit().await?;

        Ok(BookCreated {
            book: self.get_by_id(id).await?,
            copy_id,
        })
    }
}

/// Whether `needle` (already lowercased) occurs in the title or author
fn matches_term(book: &BookSummary, needle: &str) -> bool {
    book.title.to_lowercase().contains(needle) || book.author.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(title: &str, author: &str) -> BookSummary {
        BookSummary {
            id: 1,
            title: title.to_string(),
            author: author.to_string(),
            category_id: 1,
            category: "Fiction".to_string(),
            nb_copies: 0,
            nb_available: 0,
        }
    }

    #[test]
    fn matching_folds_non_ascii_case() {
        let book = summary("ÉMILE ou de l'éducation", "Jean-Jacques Rousseau");
        assert!(matches_term(&book, &"Émile".to_lowercase()));
        assert!(matches_term(&book, "rousseau"));
        assert!(!matches_term(&book, "voltaire"));
    }

    #[test]
    fn wildcards_are_plain_characters() {
        assert!(matches_term(&summary("100% Rust", "Ferris"), "100%"));
        assert!(!matches_term(&summary("1000 Recipes", "Chef"), "100%"));
        assert!(!matches_term(&summary("Dune", "Frank Herbert"), "_"));
    }
}
