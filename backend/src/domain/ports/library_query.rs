//! Driving port for shelf reads.

use async_trait::async_trait;

use crate::domain::{BookId, Error, LibraryEntry, ReadingStatus, UserId};

use super::fixture_data::{fixture_book, fixture_entry};

/// Domain use-case port for reading a reader's shelf.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryQuery: Send + Sync {
    /// Shelf entries, newest first, optionally filtered by status.
    async fn library(
        &self,
        user_id: &UserId,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<LibraryEntry>, Error>;

    /// The reader's entry for one book.
    async fn entry(&self, user_id: &UserId, book_id: &BookId) -> Result<LibraryEntry, Error>;

    /// Most recently updated entries for the home feed.
    async fn feed(&self, user_id: &UserId) -> Result<Vec<LibraryEntry>, Error>;
}

/// Fixture query whose shelf holds the fixture book as `want_to_read`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLibraryQuery;

#[async_trait]
impl LibraryQuery for FixtureLibraryQuery {
    async fn library(
        &self,
        user_id: &UserId,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<LibraryEntry>, Error> {
        let entry = fixture_entry(user_id, fixture_book(None), ReadingStatus::WantToRead);
        Ok(status
            .is_none_or(|wanted| wanted == entry.entry.status)
            .then_some(entry)
            .into_iter()
            .collect())
    }

    async fn entry(&self, user_id: &UserId, book_id: &BookId) -> Result<LibraryEntry, Error> {
        let book = fixture_book(None);
        if &book.id != book_id {
            return Err(Error::not_found("book is not in your library"));
        }
        Ok(fixture_entry(user_id, book, ReadingStatus::WantToRead))
    }

    async fn feed(&self, user_id: &UserId) -> Result<Vec<LibraryEntry>, Error> {
        self.library(user_id, None).await
    }
}
