//! Driven port for the external book catalog.
//!
//! The domain owns the volume shape so search and library hydration stay
//! independent of the catalog's wire format.

use async_trait::async_trait;

use crate::domain::{CatalogVolume, ExternalVolumeId, SearchQuery};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the book catalog.
    pub enum BookCatalogSourceError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "book catalog transport failed: {message}",
        /// Catalog call exceeded timeout.
        Timeout { message: String } =>
            "book catalog timeout: {message}",
        /// Catalog rate-limited the request.
        RateLimited { message: String } =>
            "book catalog rate limited request: {message}",
        /// Catalog response could not be decoded.
        Decode { message: String } =>
            "book catalog response decode failed: {message}",
        /// Adapter rejected request before execution.
        InvalidRequest { message: String } =>
            "book catalog request invalid: {message}",
    }
}

/// Port for searching and fetching catalog volumes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookCatalogSource: Send + Sync {
    /// Free-text volume search returning at most `limit` volumes.
    async fn search(
        &self,
        query: &SearchQuery,
        limit: usize,
    ) -> Result<Vec<CatalogVolume>, BookCatalogSourceError>;

    /// Fetch one volume; `None` when the catalog does not know the id.
    async fn fetch(
        &self,
        volume_id: &ExternalVolumeId,
    ) -> Result<Option<CatalogVolume>, BookCatalogSourceError>;
}

/// Fixture implementation for offline use; the catalog is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureBookCatalogSource;

#[async_trait]
impl BookCatalogSource for FixtureBookCatalogSource {
    async fn search(
        &self,
        _query: &SearchQuery,
        _limit: usize,
    ) -> Result<Vec<CatalogVolume>, BookCatalogSourceError> {
        Ok(Vec::new())
    }

    async fn fetch(
        &self,
        _volume_id: &ExternalVolumeId,
    ) -> Result<Option<CatalogVolume>, BookCatalogSourceError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_catalog_is_empty() {
        let source = FixtureBookCatalogSource;
        let query = SearchQuery::parse("dune").expect("valid query");
        assert!(source.search(&query, 5).await.expect("search").is_empty());
        let id = ExternalVolumeId::new("abc").expect("volume id");
        assert!(source.fetch(&id).await.expect("fetch").is_none());
    }

    #[test]
    fn errors_render_context() {
        let error = BookCatalogSourceError::rate_limited("status 429");
        assert_eq!(
            error.to_string(),
            "book catalog rate limited request: status 429"
        );
    }
}
