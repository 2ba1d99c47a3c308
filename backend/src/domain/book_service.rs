//! Book lookup service combining the local table with the external catalog.
//!
//! Search prefers local rows and only reaches out to the catalog when the
//! local table yields fewer than [`crate::domain::LOCAL_RESULT_THRESHOLD`]
//! hits. Catalog failures during search degrade to local results.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{BookCatalogSource, BookQuery, BookRepository};
use crate::domain::service_errors::{map_book_error, map_catalog_error};
use crate::domain::{
    BookRef, BookSummary, CATALOG_RESULT_LIMIT, Error, LOCAL_SEARCH_LIMIT, Locale, MessageKey,
    SearchQuery, Translator, local_results_suffice, merge_results,
};

/// Book service implementing [`BookQuery`].
#[derive(Clone)]
pub struct BookService<B, C> {
    books: Arc<B>,
    catalog: Arc<C>,
}

impl<B, C> BookService<B, C> {
    pub fn new(books: Arc<B>, catalog: Arc<C>) -> Self {
        Self { books, catalog }
    }
}

#[async_trait]
impl<B, C> BookQuery for BookService<B, C>
where
    B: BookRepository,
    C: BookCatalogSource,
{
    async fn book(&self, book_ref: &BookRef, locale: Locale) -> Result<BookSummary, Error> {
        match book_ref {
            BookRef::Local(id) => self
                .books
                .find_by_id(id)
                .await
                .map_err(map_book_error)?
                .map(BookSummary::from)
                .ok_or_else(|| Error::not_found("book not found")),
            BookRef::External(volume_id) => {
                let unknown = Translator::new(locale).text(MessageKey::UnknownAuthor);
                self.catalog
                    .fetch(volume_id)
                    .await
                    .map_err(map_catalog_error)?
                    .map(|volume| volume.to_summary(unknown))
                    .ok_or_else(|| Error::not_found("book not found"))
            }
        }
    }

    async fn search(&self, query: &str, locale: Locale) -> Result<Vec<BookSummary>, Error> {
        let Some(query) = SearchQuery::parse(query) else {
            return Ok(Vec::new());
        };
        let local: Vec<BookSummary> = self
            .books
            .search_titles(&query, LOCAL_SEARCH_LIMIT)
            .await
            .map_err(map_book_error)?
            .into_iter()
            .map(BookSummary::from)
            .collect();
        if local_results_suffice(&local) {
            return Ok(local);
        }

        let volumes = match self.catalog.search(&query, CATALOG_RESULT_LIMIT).await {
            Ok(volumes) => volumes,
            Err(err) => {
                warn!(error = %err, "book catalog search failed; serving local results");
                return Ok(local);
            }
        };
        let unknown = Translator::new(locale).text(MessageKey::UnknownAuthor);
        let external = volumes
            .iter()
            .map(|volume| volume.to_summary(unknown))
            .collect();
        Ok(merge_results(local, external))
    }
}

#[cfg(test)]
#[path = "book_service_tests.rs"]
mod tests;
