//! Book catalogue model.
//!
//! Books live in the local table once any reader shelves them or an admin
//! creates them. Volumes from the external catalog are addressed with a
//! `google_` prefixed identifier until they are imported.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::bounded_text;

/// Prefix marking identifiers that refer to the external book catalog.
pub const EXTERNAL_ID_PREFIX: &str = "google_";

/// Maximum length of a book title.
pub const TITLE_MAX: usize = 500;
/// Maximum length of an author string.
pub const AUTHOR_MAX: usize = 300;
/// Maximum length of a book description.
pub const DESCRIPTION_MAX: usize = 10_000;
/// Maximum length of short metadata fields (ISBN, publisher, date).
pub const METADATA_MAX: usize = 255;
/// Maximum length of a cover URL.
pub const COVER_URL_MAX: usize = 2048;

/// Validation errors raised by book constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookValidationError {
    #[error("book id must not be empty")]
    EmptyId,
    #[error("book id must be a UUID or a '{EXTERNAL_ID_PREFIX}' catalog id")]
    InvalidId,
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("pageCount must not be negative")]
    NegativePageCount,
    #[error("{field} must be an http(s) URL")]
    InvalidUrl { field: &'static str },
}

/// Identifier of a book stored locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Volume identifier in the external catalog, without the prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalVolumeId(String);

impl ExternalVolumeId {
    /// Wrap a catalog volume id.
    pub fn new(raw: impl Into<String>) -> Result<Self, BookValidationError> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw.len() <= 64
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
        if !valid {
            return Err(BookValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Public identifier carrying the external prefix.
    pub fn prefixed(&self) -> String {
        format!("{EXTERNAL_ID_PREFIX}{}", self.0)
    }
}

/// Reference to a book by either its local id or its catalog volume id.
///
/// # Examples
/// ```
/// use shelfmate::domain::BookRef;
///
/// let external = BookRef::parse("google_zyTCAlFPjgYC").expect("catalog id");
/// assert!(matches!(external, BookRef::External(_)));
/// assert_eq!(external.to_string(), "google_zyTCAlFPjgYC");
///
/// let local = BookRef::parse("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("uuid");
/// assert!(matches!(local, BookRef::Local(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BookRef {
    Local(BookId),
    External(ExternalVolumeId),
}

impl BookRef {
    /// Parse a path or payload identifier.
    pub fn parse(raw: &str) -> Result<Self, BookValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(BookValidationError::EmptyId);
        }
        if let Some(volume) = raw.strip_prefix(EXTERNAL_ID_PREFIX) {
            return ExternalVolumeId::new(volume).map(Self::External);
        }
        Uuid::parse_str(raw)
            .map(|uuid| Self::Local(BookId::from_uuid(uuid)))
            .map_err(|_| BookValidationError::InvalidId)
    }
}

impl fmt::Display for BookRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(id) => id.fmt(f),
            Self::External(volume) => f.write_str(&volume.prefixed()),
        }
    }
}

/// Book row as stored locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<i32>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Raw book fields from an admin form.
#[derive(Debug, Clone, Default)]
pub struct BookDraft {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover_url: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<i32>,
    pub description: Option<String>,
}

/// Validated book content ready for insertion or update.
///
/// ## Invariants
/// - `title` and `author` are trimmed and non-empty.
/// - Optional text fields are `None` rather than blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<i32>,
    pub description: Option<String>,
}

fn required(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<String, BookValidationError> {
    optional(value, field, max)?.ok_or(BookValidationError::MissingField { field })
}

fn optional(
    value: Option<String>,
    field: &'static str,
    max: usize,
) -> Result<Option<String>, BookValidationError> {
    bounded_text(value, field, max).map_err(|_| BookValidationError::FieldTooLong { field, max })
}

fn is_http_url(raw: &str) -> bool {
    url::Url::parse(raw).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
}

fn truncated(raw: &str, max: usize) -> String {
    raw.trim().chars().take(max).collect::<String>().trim_end().to_owned()
}

fn truncated_opt(raw: Option<&str>, max: usize) -> Option<String> {
    raw.map(|text| truncated(text, max))
        .filter(|text| !text.is_empty())
}

impl NewBook {
    /// Validate a draft.
    pub fn try_from_draft(draft: BookDraft) -> Result<Self, BookValidationError> {
        if draft.page_count.is_some_and(|count| count < 0) {
            return Err(BookValidationError::NegativePageCount);
        }
        let cover_url = optional(draft.cover_url, "coverUrl", COVER_URL_MAX)?;
        if cover_url.as_deref().is_some_and(|url| !is_http_url(url)) {
            return Err(BookValidationError::InvalidUrl { field: "coverUrl" });
        }
        Ok(Self {
            title: required(draft.title, "title", TITLE_MAX)?,
            author: required(draft.author, "author", AUTHOR_MAX)?,
            cover_url,
            isbn: optional(draft.isbn, "isbn", METADATA_MAX)?,
            publisher: optional(draft.publisher, "publisher", METADATA_MAX)?,
            published_date: optional(draft.published_date, "publishedDate", METADATA_MAX)?,
            page_count: draft.page_count,
            description: optional(draft.description, "description", DESCRIPTION_MAX)?,
        })
    }

    /// Import a catalog volume as-is, truncating over-long text and dropping
    /// a cover that is not an http(s) URL.
    ///
    /// Catalog titles are never blank (untitled volumes are skipped when the
    /// response is decoded), so this cannot fail.
    pub fn from_catalog(volume: &CatalogVolume, unknown_author: &str) -> Self {
        Self {
            title: truncated(&volume.title, TITLE_MAX),
            author: truncated(volume.primary_author(unknown_author), AUTHOR_MAX),
            cover_url: volume
                .thumbnail
                .as_deref()
                .map(str::trim)
                .filter(|url| url.chars().count() <= COVER_URL_MAX && is_http_url(url))
                .map(str::to_owned),
            isbn: truncated_opt(volume.isbn.as_deref(), METADATA_MAX),
            publisher: truncated_opt(volume.publisher.as_deref(), METADATA_MAX),
            published_date: truncated_opt(volume.published_date.as_deref(), METADATA_MAX),
            page_count: volume.page_count.filter(|count| *count >= 0),
            description: truncated_opt(volume.description.as_deref(), DESCRIPTION_MAX),
        }
    }

    /// Lowercase, whitespace-collapsed title used for duplicate detection.
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }
}

/// Normalise a title for duplicate detection.
///
/// # Examples
/// ```
/// use shelfmate::domain::normalize_title;
///
/// assert_eq!(normalize_title("  Kürk  Mantolu   Madonna "), "kürk mantolu madonna");
/// ```
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Where a book summary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSource {
    Local,
    Google,
}

/// Book shape shared by search results and the detail view.
///
/// `id` is the local UUID, or the prefixed catalog id for volumes that have
/// not been imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<i32>,
    pub description: Option<String>,
    pub source: BookSource,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title,
            author: book.author,
            cover_url: book.cover_url,
            isbn: book.isbn,
            publisher: book.publisher,
            published_date: book.published_date,
            page_count: book.page_count,
            description: book.description,
            source: BookSource::Local,
        }
    }
}

/// Volume as described by the external catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogVolume {
    pub volume_id: ExternalVolumeId,
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub page_count: Option<i32>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub isbn: Option<String>,
}

impl CatalogVolume {
    /// First listed author, or `unknown_author` when the volume has none.
    pub fn primary_author<'a>(&'a self, unknown_author: &'a str) -> &'a str {
        self.authors
            .iter()
            .map(|author| author.trim())
            .find(|author| !author.is_empty())
            .unwrap_or(unknown_author)
    }

    /// Summary presented to readers before the volume is imported.
    pub fn to_summary(&self, unknown_author: &str) -> BookSummary {
        BookSummary {
            id: self.volume_id.prefixed(),
            title: self.title.clone(),
            author: self.primary_author(unknown_author).to_owned(),
            cover_url: self.thumbnail.clone(),
            isbn: self.isbn.clone(),
            publisher: self.publisher.clone(),
            published_date: self.published_date.clone(),
            page_count: self.page_count,
            description: self.description.clone(),
            source: BookSource::Google,
        }
    }
}
