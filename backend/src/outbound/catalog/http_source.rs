//! Reqwest-backed Google Books source adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into domain catalog volumes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{VolumeDto, VolumeListDto};
use crate::domain::ports::{BookCatalogSource, BookCatalogSourceError};
use crate::domain::{CatalogVolume, ExternalVolumeId, SearchQuery};

const DEFAULT_USER_AGENT: &str = "shelfmate-backend/0.1";

/// Catalog source adapter issuing GET requests against the `volumes` API.
pub struct GoogleBooksHttpSource {
    client: Client,
    base_url: Url,
    lang_restrict: String,
}

impl GoogleBooksHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// `base_url` must end with a slash so `volumes` resolves beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        lang_restrict: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url,
            lang_restrict: lang_restrict.into(),
        })
    }

    fn search_url(&self, query: &SearchQuery, limit: usize) -> Result<Url, BookCatalogSourceError> {
        let mut url = self
            .base_url
            .join("volumes")
            .map_err(|err| BookCatalogSourceError::invalid_request(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("q", query.as_str())
            .append_pair("maxResults", &limit.to_string())
            .append_pair("langRestrict", &self.lang_restrict);
        Ok(url)
    }

    fn volume_url(&self, volume_id: &ExternalVolumeId) -> Result<Url, BookCatalogSourceError> {
        let mut url = self
            .base_url
            .join(&format!("volumes/{}", volume_id.as_str()))
            .map_err(|err| BookCatalogSourceError::invalid_request(err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("langRestrict", &self.lang_restrict);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<(StatusCode, Vec<u8>), BookCatalogSourceError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl BookCatalogSource for GoogleBooksHttpSource {
    async fn search(
        &self,
        query: &SearchQuery,
        limit: usize,
    ) -> Result<Vec<CatalogVolume>, BookCatalogSourceError> {
        let (status, body) = self.get(self.search_url(query, limit)?).await?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        let mut volumes = parse_volume_list(body.as_ref())?;
        volumes.truncate(limit);
        Ok(volumes)
    }

    async fn fetch(
        &self,
        volume_id: &ExternalVolumeId,
    ) -> Result<Option<CatalogVolume>, BookCatalogSourceError> {
        let (status, body) = self.get(self.volume_url(volume_id)?).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_volume(body.as_ref()).map(Some)
    }
}

fn parse_volume_list(body: &[u8]) -> Result<Vec<CatalogVolume>, BookCatalogSourceError> {
    let decoded: VolumeListDto = serde_json::from_slice(body).map_err(|error| {
        BookCatalogSourceError::decode(format!("invalid volume list payload: {error}"))
    })?;
    Ok(decoded.into_domain_volumes())
}

fn parse_volume(body: &[u8]) -> Result<CatalogVolume, BookCatalogSourceError> {
    let decoded: VolumeDto = serde_json::from_slice(body).map_err(|error| {
        BookCatalogSourceError::decode(format!("invalid volume payload: {error}"))
    })?;
    decoded
        .into_domain_volume()
        .map_err(BookCatalogSourceError::decode)
}

fn map_transport_error(error: reqwest::Error) -> BookCatalogSourceError {
    if error.is_timeout() {
        BookCatalogSourceError::timeout(error.to_string())
    } else {
        BookCatalogSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> BookCatalogSourceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => BookCatalogSourceError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            BookCatalogSourceError::timeout(message)
        }
        _ if status.is_client_error() => BookCatalogSourceError::invalid_request(message),
        _ => BookCatalogSourceError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network catalog mapping helpers.

    use super::*;
    use rstest::rstest;

    fn source() -> GoogleBooksHttpSource {
        let base = Url::parse("https://www.googleapis.com/books/v1/").expect("base url");
        GoogleBooksHttpSource::new(base, Duration::from_secs(2), "tr").expect("client builds")
    }

    #[test]
    fn search_url_carries_limit_and_language() {
        let query = SearchQuery::parse("kürk mantolu").expect("query");
        let url = source().search_url(&query, 5).expect("url builds");

        assert_eq!(url.path(), "/books/v1/volumes");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".to_owned(), "kürk mantolu".to_owned())));
        assert!(pairs.contains(&("maxResults".to_owned(), "5".to_owned())));
        assert!(pairs.contains(&("langRestrict".to_owned(), "tr".to_owned())));
    }

    #[test]
    fn volume_url_targets_the_volume() {
        let id = ExternalVolumeId::new("zyTCAlFPjgYC").expect("volume id");
        let url = source().volume_url(&id).expect("url builds");
        assert_eq!(url.path(), "/books/v1/volumes/zyTCAlFPjgYC");
    }

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, "RateLimited")]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, "Timeout")]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, "Timeout")]
    #[case::forbidden(StatusCode::FORBIDDEN, "InvalidRequest")]
    #[case::server_error(StatusCode::SERVICE_UNAVAILABLE, "Transport")]
    fn maps_http_statuses_to_expected_domain_errors(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, b"{\"error\":{\"message\":\"quota\"}}");
        let matched = match expected {
            "RateLimited" => matches!(error, BookCatalogSourceError::RateLimited { .. }),
            "Timeout" => matches!(error, BookCatalogSourceError::Timeout { .. }),
            "InvalidRequest" => matches!(error, BookCatalogSourceError::InvalidRequest { .. }),
            "Transport" => matches!(error, BookCatalogSourceError::Transport { .. }),
            _ => panic!("unsupported test expectation: {expected}"),
        };
        assert!(matched, "{status} should map to {expected}, got {error:?}");
    }

    #[test]
    fn parses_volume_list_into_domain_volumes() {
        let body = r#"{
            "kind": "books#volumes",
            "totalItems": 2,
            "items": [
                {
                    "id": "abc123",
                    "volumeInfo": {
                        "title": "Kürk Mantolu Madonna",
                        "authors": ["Sabahattin Ali"],
                        "pageCount": 160,
                        "imageLinks": { "thumbnail": "http://books.google.com/k.jpg" },
                        "industryIdentifiers": [
                            { "type": "ISBN_13", "identifier": "9789753638029" },
                            { "type": "ISBN_10", "identifier": "9753638027" }
                        ]
                    }
                },
                { "id": "untitled", "volumeInfo": {} }
            ]
        }"#;

        let volumes = parse_volume_list(body.as_bytes()).expect("JSON should decode");
        assert_eq!(volumes.len(), 1, "untitled volumes are skipped");
        let volume = &volumes[0];
        assert_eq!(volume.volume_id.as_str(), "abc123");
        assert_eq!(volume.authors, vec!["Sabahattin Ali".to_owned()]);
        assert_eq!(volume.isbn.as_deref(), Some("9789753638029"));
        assert_eq!(volume.thumbnail.as_deref(), Some("https://books.google.com/k.jpg"));
        assert_eq!(volume.page_count, Some(160));
    }

    #[test]
    fn missing_items_means_no_results() {
        let volumes = parse_volume_list(br#"{"kind":"books#volumes","totalItems":0}"#)
            .expect("JSON should decode");
        assert!(volumes.is_empty());
    }

    #[test]
    fn malformed_payloads_are_decode_errors() {
        let error = parse_volume(b"<html>").expect_err("decode should fail");
        assert!(matches!(error, BookCatalogSourceError::Decode { .. }));
    }
}
