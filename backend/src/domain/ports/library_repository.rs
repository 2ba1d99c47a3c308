//! Port for reader shelf entries.

use async_trait::async_trait;

use crate::domain::{AddOutcome, BookId, LibraryEntry, ReadingStatus, ReviewUpdate, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by library repository adapters.
    pub enum LibraryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "library repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "library repository query failed: {message}",
        /// The referenced book does not exist.
        MissingBook { book_id: String } =>
            "book {book_id} does not exist",
    }
}

/// Port for shelf persistence. Every operation is scoped to one reader.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    async fn find_entry(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError>;

    /// Shelve a book as `want_to_read`, or return the existing entry.
    async fn add(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Result<AddOutcome, LibraryRepositoryError>;

    /// Entries ordered by creation time, newest first.
    async fn list(
        &self,
        user_id: &UserId,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<LibraryEntry>, LibraryRepositoryError>;

    /// Most recently updated entries.
    async fn recent(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<LibraryEntry>, LibraryRepositoryError>;

    /// Returns `None` when the reader has not shelved the book.
    async fn set_status(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        status: ReadingStatus,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError>;

    /// Returns `false` when there was no entry to delete.
    async fn remove(&self, user_id: &UserId, book_id: &BookId)
    -> Result<bool, LibraryRepositoryError>;

    async fn set_review(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        review: &ReviewUpdate,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError>;

    async fn set_favorite(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        is_favorite: bool,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError>;
}

/// Fixture implementation for running without a database; every shelf is
/// empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLibraryRepository;

#[async_trait]
impl LibraryRepository for FixtureLibraryRepository {
    async fn find_entry(
        &self,
        _user_id: &UserId,
        _book_id: &BookId,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
        Ok(None)
    }

    async fn add(
        &self,
        _user_id: &UserId,
        book_id: &BookId,
    ) -> Result<AddOutcome, LibraryRepositoryError> {
        Err(LibraryRepositoryError::missing_book(book_id.to_string()))
    }

    async fn list(
        &self,
        _user_id: &UserId,
        _status: Option<ReadingStatus>,
    ) -> Result<Vec<LibraryEntry>, LibraryRepositoryError> {
        Ok(Vec::new())
    }

    async fn recent(
        &self,
        _user_id: &UserId,
        _limit: i64,
    ) -> Result<Vec<LibraryEntry>, LibraryRepositoryError> {
        Ok(Vec::new())
    }

    async fn set_status(
        &self,
        _user_id: &UserId,
        _book_id: &BookId,
        _status: ReadingStatus,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
        Ok(None)
    }

    async fn remove(
        &self,
        _user_id: &UserId,
        _book_id: &BookId,
    ) -> Result<bool, LibraryRepositoryError> {
        Ok(false)
    }

    async fn set_review(
        &self,
        _user_id: &UserId,
        _book_id: &BookId,
        _review: &ReviewUpdate,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
        Ok(None)
    }

    async fn set_favorite(
        &self,
        _user_id: &UserId,
        _book_id: &BookId,
        _is_favorite: bool,
    ) -> Result<Option<LibraryEntry>, LibraryRepositoryError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_add_reports_missing_book() {
        let book_id = BookId::random();
        let err = FixtureLibraryRepository
            .add(&UserId::random(), &book_id)
            .await
            .expect_err("fixture has no books");
        assert_eq!(err, LibraryRepositoryError::missing_book(book_id.to_string()));
    }

    #[tokio::test]
    async fn fixture_shelf_is_empty() {
        let entries = FixtureLibraryRepository
            .list(&UserId::random(), None)
            .await
            .expect("fixture list succeeds");
        assert!(entries.is_empty());
    }
}
