//! Driving port for shelf mutations.

use async_trait::async_trait;

use crate::domain::{
    AddOutcome, BookId, BookRef, Error, LibraryEntry, Locale, ReadingStatus, ReviewUpdate,
    StatusChange, UserId,
};

use super::fixture_data::{fixture_book, fixture_entry};

/// Result of a status change; `remove` deletes the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChangeOutcome {
    Updated(LibraryEntry),
    Removed,
}

/// Domain use-case port for editing a reader's shelf.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryCommand: Send + Sync {
    /// Shelve a local book or a catalog volume as `want_to_read`.
    ///
    /// Catalog volumes are imported first; shelving an already shelved book
    /// returns the existing entry.
    async fn add(
        &self,
        user_id: &UserId,
        book_ref: &BookRef,
        locale: Locale,
    ) -> Result<AddOutcome, Error>;

    /// Change status or remove the entry.
    async fn change_status(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        change: StatusChange,
    ) -> Result<StatusChangeOutcome, Error>;

    /// Replace rating and notes.
    async fn review(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        review: &ReviewUpdate,
    ) -> Result<LibraryEntry, Error>;

    async fn set_favorite(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        is_favorite: bool,
    ) -> Result<LibraryEntry, Error>;
}

/// Fixture command that only knows the fixture book.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLibraryCommand;

fn fixture_entry_for(user_id: &UserId, book_id: &BookId) -> Result<LibraryEntry, Error> {
    let book = fixture_book(None);
    if &book.id != book_id {
        return Err(Error::not_found("book is not in your library"));
    }
    Ok(fixture_entry(user_id, book, ReadingStatus::WantToRead))
}

#[async_trait]
impl LibraryCommand for FixtureLibraryCommand {
    async fn add(
        &self,
        user_id: &UserId,
        book_ref: &BookRef,
        _locale: Locale,
    ) -> Result<AddOutcome, Error> {
        let book = fixture_book(None);
        match book_ref {
            BookRef::Local(id) if *id == book.id => Ok(AddOutcome::Created(fixture_entry(
                user_id,
                book,
                ReadingStatus::WantToRead,
            ))),
            _ => Err(Error::not_found("book not found")),
        }
    }

    async fn change_status(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        change: StatusChange,
    ) -> Result<StatusChangeOutcome, Error> {
        let mut entry = fixture_entry_for(user_id, book_id)?;
        match change {
            StatusChange::Remove => Ok(StatusChangeOutcome::Removed),
            StatusChange::Set(status) => {
                entry.entry.status = status;
                Ok(StatusChangeOutcome::Updated(entry))
            }
        }
    }

    async fn review(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        review: &ReviewUpdate,
    ) -> Result<LibraryEntry, Error> {
        let mut entry = fixture_entry_for(user_id, book_id)?;
        entry.entry.rating = review.rating;
        entry.entry.notes = review.notes.clone();
        Ok(entry)
    }

    async fn set_favorite(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        is_favorite: bool,
    ) -> Result<LibraryEntry, Error> {
        let mut entry = fixture_entry_for(user_id, book_id)?;
        entry.entry.is_favorite = is_favorite;
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_remove_reports_removal() {
        let book = fixture_book(None);
        let outcome = FixtureLibraryCommand
            .change_status(&UserId::random(), &book.id, StatusChange::Remove)
            .await
            .expect("fixture change");
        assert_eq!(outcome, StatusChangeOutcome::Removed);
    }

    #[tokio::test]
    async fn fixture_rejects_unknown_books() {
        let err = FixtureLibraryCommand
            .set_favorite(&UserId::random(), &BookId::random(), true)
            .await
            .expect_err("unknown book");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
