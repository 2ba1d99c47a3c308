//! Port for the local book table.

use async_trait::async_trait;

use crate::domain::{Book, BookId, NewBook, SearchQuery};

use super::define_port_error;

define_port_error! {
    /// Errors raised by book repository adapters.
    pub enum BookRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "book repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "book repository query failed: {message}",
    }
}

/// Port for book storage and lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, BookRepositoryError>;

    /// Books whose title matches the query, newest first.
    async fn search_titles(
        &self,
        query: &SearchQuery,
        limit: i64,
    ) -> Result<Vec<Book>, BookRepositoryError>;

    /// Return the existing book matching `book` or insert it.
    ///
    /// A match is a book with the same ISBN, or with the same normalised
    /// title and author when `book` has no ISBN. The lookup and insert run in
    /// one transaction.
    async fn find_or_insert(&self, book: &NewBook) -> Result<Book, BookRepositoryError>;

    async fn insert(&self, book: &NewBook) -> Result<Book, BookRepositoryError>;

    /// Replace a book's content. Returns `None` when the book does not exist.
    async fn update(&self, id: &BookId, book: &NewBook)
    -> Result<Option<Book>, BookRepositoryError>;

    /// Delete a book with its shelf entries and recommendations in one
    /// transaction. Returns `false` when the book does not exist.
    async fn delete_cascade(&self, id: &BookId) -> Result<bool, BookRepositoryError>;

    /// Admin listing, newest first, optionally filtered by title or author.
    async fn list(&self, query: Option<SearchQuery>) -> Result<Vec<Book>, BookRepositoryError>;
}
