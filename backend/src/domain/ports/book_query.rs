//! Driving port for book detail and search.

use async_trait::async_trait;

use crate::domain::{BookRef, BookSummary, Error, Locale, SearchQuery};

use super::fixture_data::fixture_book;

/// Domain use-case port for looking up books.
///
/// `locale` selects the placeholder shown for catalog volumes without an
/// author.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookQuery: Send + Sync {
    /// Local book or catalog volume by reference.
    async fn book(&self, book_ref: &BookRef, locale: Locale) -> Result<BookSummary, Error>;

    /// Merged local and catalog results for a free-text query.
    async fn search(&self, query: &str, locale: Locale) -> Result<Vec<BookSummary>, Error>;
}

/// Fixture query serving a single local book.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookQuery;

#[async_trait]
impl BookQuery for FixtureBookQuery {
    async fn book(&self, book_ref: &BookRef, _locale: Locale) -> Result<BookSummary, Error> {
        let book = fixture_book(None);
        match book_ref {
            BookRef::Local(id) if *id == book.id => Ok(book.into()),
            _ => Err(Error::not_found("book not found")),
        }
    }

    async fn search(&self, query: &str, _locale: Locale) -> Result<Vec<BookSummary>, Error> {
        let Some(query) = SearchQuery::parse(query) else {
            return Ok(Vec::new());
        };
        let book = fixture_book(None);
        let needle = query.as_str().to_lowercase();
        if book.title.to_lowercase().contains(&needle) {
            Ok(vec![book.into()])
        } else {
            Ok(Vec::new())
        }
    }
}
