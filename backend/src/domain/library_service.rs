//! Shelf service: adding books, status changes, reviews and the home feed.
//!
//! Catalog volumes are imported into the local table on first shelve so
//! every shelf entry references a local book row.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    BookCatalogSource, BookRepository, LibraryCommand, LibraryQuery, LibraryRepository,
    StatusChangeOutcome,
};
use crate::domain::service_errors::{map_book_error, map_catalog_error, map_library_error};
use crate::domain::{
    AddOutcome, Book, BookId, BookRef, Error, ExternalVolumeId, FEED_LIMIT, LibraryEntry, Locale,
    MessageKey, NewBook, ReadingStatus, ReviewUpdate, StatusChange, Translator, UserId,
};

/// Library service implementing [`LibraryCommand`] and [`LibraryQuery`].
#[derive(Clone)]
pub struct LibraryService<L, B, C> {
    library: Arc<L>,
    books: Arc<B>,
    catalog: Arc<C>,
}

impl<L, B, C> LibraryService<L, B, C> {
    pub fn new(library: Arc<L>, books: Arc<B>, catalog: Arc<C>) -> Self {
        Self {
            library,
            books,
            catalog,
        }
    }
}

fn not_shelved() -> Error {
    Error::not_found("book is not in your library")
}

impl<L, B, C> LibraryService<L, B, C>
where
    L: LibraryRepository,
    B: BookRepository,
    C: BookCatalogSource,
{
    async fn resolve_book(&self, book_ref: &BookRef, locale: Locale) -> Result<Book, Error> {
        match book_ref {
            BookRef::Local(id) => self
                .books
                .find_by_id(id)
                .await
                .map_err(map_book_error)?
                .ok_or_else(|| Error::not_found("book not found")),
            BookRef::External(volume_id) => self.import_volume(volume_id, locale).await,
        }
    }

    /// Fetch a catalog volume and store it locally, reusing an existing row
    /// with the same ISBN or normalized title.
    async fn import_volume(
        &self,
        volume_id: &ExternalVolumeId,
        locale: Locale,
    ) -> Result<Book, Error> {
        let volume = self
            .catalog
            .fetch(volume_id)
            .await
            .map_err(map_catalog_error)?
            .ok_or_else(|| Error::not_found("book not found"))?;
        let unknown = Translator::new(locale).text(MessageKey::UnknownAuthor);
        let new_book = NewBook::from_catalog(&volume, unknown);
        let book = self
            .books
            .find_or_insert(&new_book)
            .await
            .map_err(map_book_error)?;
        info!(book_id = %book.id, volume_id = volume_id.as_str(), "catalog volume imported");
        Ok(book)
    }
}

#[async_trait]
impl<L, B, C> LibraryCommand for LibraryService<L, B, C>
where
    L: LibraryRepository,
    B: BookRepository,
    C: BookCatalogSource,
{
    async fn add(
        &self,
        user_id: &UserId,
        book_ref: &BookRef,
        locale: Locale,
    ) -> Result<AddOutcome, Error> {
        let book = self.resolve_book(book_ref, locale).await?;
        self.library
            .add(user_id, &book.id)
            .await
            .map_err(map_library_error)
    }

    async fn change_status(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        change: StatusChange,
    ) -> Result<StatusChangeOutcome, Error> {
        match change {
            StatusChange::Remove => {
                let removed = self
                    .library
                    .remove(user_id, book_id)
                    .await
                    .map_err(map_library_error)?;
                if removed {
                    Ok(StatusChangeOutcome::Removed)
                } else {
                    Err(not_shelved())
                }
            }
            StatusChange::Set(status) => self
                .library
                .set_status(user_id, book_id, status)
                .await
                .map_err(map_library_error)?
                .map(StatusChangeOutcome::Updated)
                .ok_or_else(not_shelved),
        }
    }

    async fn review(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        review: &ReviewUpdate,
    ) -> Result<LibraryEntry, Error> {
        self.library
            .set_review(user_id, book_id, review)
            .await
            .map_err(map_library_error)?
            .ok_or_else(not_shelved)
    }

    async fn set_favorite(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        is_favorite: bool,
    ) -> Result<LibraryEntry, Error> {
        self.library
            .set_favorite(user_id, book_id, is_favorite)
            .await
            .map_err(map_library_error)?
            .ok_or_else(not_shelved)
    }
}

#[async_trait]
impl<L, B, C> LibraryQuery for LibraryService<L, B, C>
where
    L: LibraryRepository,
    B: BookRepository,
    C: BookCatalogSource,
{
    async fn library(
        &self,
        user_id: &UserId,
        status: Option<ReadingStatus>,
    ) -> Result<Vec<LibraryEntry>, Error> {
        self.library
            .list(user_id, status)
            .await
            .map_err(map_library_error)
    }

    async fn entry(&self, user_id: &UserId, book_id: &BookId) -> Result<LibraryEntry, Error> {
        self.library
            .find_entry(user_id, book_id)
            .await
            .map_err(map_library_error)?
            .ok_or_else(not_shelved)
    }

    async fn feed(&self, user_id: &UserId) -> Result<Vec<LibraryEntry>, Error> {
        self.library
            .recent(user_id, FEED_LIMIT)
            .await
            .map_err(map_library_error)
    }
}

#[cfg(test)]
#[path = "library_service_tests.rs"]
mod tests;
