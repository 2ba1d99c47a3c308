//! Book catalog outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `BookCatalogSource` port against the Google Books `volumes` API.

mod dto;
mod http_source;

pub use http_source::GoogleBooksHttpSource;
