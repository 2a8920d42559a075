//! Catalog service: books, copies and their lookups

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookCreated, BookSummary, NewBook},
        copy::{AvailableCopy, BookCopy},
        reference::{BookCategory, User},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books, filtered by a title/author substring when given
    pub async fn search_books(&self, term: Option<&str>) -> AppResult<Vec<BookSummary>> {
        self.repository.books.search(term).await
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Catalogue a book, optionally with its first copy
    pub async fn add_book(&self, book: NewBook) -> AppResult<BookCreated> {
        let book = book.normalized();
        book.validate()?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(
            book_id = created.book.id,
            copy_id = ?created.copy_id,
            added_by = book.added_by,
            "Book added to catalog"
        );
        Ok(created)
    }

    /// Register another physical copy of a book
    pub async fn add_copy(&self, book_id: i64, added_by: i64) -> AppResult<BookCopy> {
        let copy = self.repository.copies.create(book_id, added_by).await?;
        tracing::info!(book_id, copy_id = copy.id, added_by, "Copy added");
        Ok(copy)
    }

    pub async fn list_copies(&self, book_id: i64) -> AppResult<Vec<BookCopy>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.copies.list_for_book(book_id).await
    }

    /// Copies that can be issued right now
    pub async fn list_available_copies(&self) -> AppResult<Vec<AvailableCopy>> {
        self.repository.copies.list_available().await
    }

    pub async fn book_categories(&self) -> AppResult<Vec<BookCategory>> {
        self.repository.reference.book_categories().await
    }

    /// Staff users that can be credited with catalog and circulation work
    pub async fn librarians(&self) -> AppResult<Vec<User>> {
        self.repository.reference.users().await
    }
}
