//! Personal library entries: reading status, ratings, notes and favourites.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::bounded_text;
use super::{Book, BookId, Profile, UserId};

/// Maximum length of personal notes on a library entry.
pub const NOTES_MAX: usize = 5000;
/// Number of entries returned by the home feed.
pub const FEED_LIMIT: i64 = 10;

/// Validation errors for library inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryValidationError {
    #[error("unknown reading status '{value}'")]
    UnknownStatus { value: String },
    #[error("rating must be between 1 and 5, or 0 to clear")]
    RatingOutOfRange,
    #[error("notes must be at most {NOTES_MAX} characters")]
    NotesTooLong,
}

/// Reading status stored on a library entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    WantToRead,
    Reading,
    Finished,
}

impl ReadingStatus {
    pub const ALL: [Self; 3] = [Self::WantToRead, Self::Reading, Self::Finished];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WantToRead => "want_to_read",
            Self::Reading => "reading",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = LibraryValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| LibraryValidationError::UnknownStatus {
                value: s.to_owned(),
            })
    }
}

/// Requested change to an entry's status; `remove` deletes the entry.
///
/// # Examples
/// ```
/// use shelfmate::domain::{ReadingStatus, StatusChange};
///
/// assert_eq!(StatusChange::parse("remove"), Ok(StatusChange::Remove));
/// assert_eq!(
///     StatusChange::parse("reading"),
///     Ok(StatusChange::Set(ReadingStatus::Reading))
/// );
/// assert!(StatusChange::parse("dnf").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Set(ReadingStatus),
    Remove,
}

impl StatusChange {
    pub fn parse(raw: &str) -> Result<Self, LibraryValidationError> {
        match raw.trim() {
            "remove" => Ok(Self::Remove),
            other => other.parse().map(Self::Set),
        }
    }
}

/// Star rating between 1 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Rating(u8);

impl Rating {
    /// Interpret a submitted rating; `None` and `0` clear it.
    pub fn from_input(raw: Option<i16>) -> Result<Option<Self>, LibraryValidationError> {
        match raw {
            None | Some(0) => Ok(None),
            Some(value) => Self::try_from(value).map(Some),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i16> for Rating {
    type Error = LibraryValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|v| (1..=5).contains(v))
            .map(Self)
            .ok_or(LibraryValidationError::RatingOutOfRange)
    }
}

impl From<Rating> for i16 {
    fn from(value: Rating) -> Self {
        i16::from(value.0)
    }
}

/// A reader's shelf entry for one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBook {
    pub id: Uuid,
    pub user_id: UserId,
    pub book_id: BookId,
    pub status: ReadingStatus,
    pub rating: Option<Rating>,
    pub notes: Option<String>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shelf entry joined with its book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    #[serde(flatten)]
    pub entry: UserBook,
    pub book: Book,
}

/// Shelf entry joined with its book and owner, for activity listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[serde(flatten)]
    pub entry: UserBook,
    pub book: Book,
    pub user: Profile,
}

/// Validated rating and notes update. Both fields are written as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewUpdate {
    pub rating: Option<Rating>,
    pub notes: Option<String>,
}

impl ReviewUpdate {
    pub fn try_new(rating: Option<i16>, notes: Option<String>) -> Result<Self, LibraryValidationError> {
        Ok(Self {
            rating: Rating::from_input(rating)?,
            notes: bounded_text(notes, "notes", NOTES_MAX)
                .map_err(|_| LibraryValidationError::NotesTooLong)?,
        })
    }
}

/// Outcome of adding a book to a library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Created(LibraryEntry),
    AlreadyShelved(LibraryEntry),
}

impl AddOutcome {
    pub fn entry(&self) -> &LibraryEntry {
        match self {
            Self::Created(entry) | Self::AlreadyShelved(entry) => entry,
        }
    }

    pub fn into_entry(self) -> LibraryEntry {
        match self {
            Self::Created(entry) | Self::AlreadyShelved(entry) => entry,
        }
    }
}

/// Per-status shelf counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryCounts {
    pub want_to_read: i64,
    pub reading: i64,
    pub finished: i64,
    pub favorites: i64,
    pub total: i64,
}

impl LibraryCounts {
    /// Tally counts from a set of entries.
    pub fn tally<'a>(entries: impl IntoIterator<Item = &'a UserBook>) -> Self {
        entries.into_iter().fold(Self::default(), |mut counts, entry| {
            match entry.status {
                ReadingStatus::WantToRead => counts.want_to_read += 1,
                ReadingStatus::Reading => counts.reading += 1,
                ReadingStatus::Finished => counts.finished += 1,
            }
            if entry.is_favorite {
                counts.favorites += 1;
            }
            counts.total += 1;
            counts
        })
    }
}

/// Public profile page: profile, shelf and counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub profile: Profile,
    pub library: Vec<LibraryEntry>,
    pub counts: LibraryCounts,
}

/// Sidebar summary for the signed-in reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub profile: Profile,
    pub counts: LibraryCounts,
    pub favorites: Vec<LibraryEntry>,
}

impl ProfileSummary {
    /// Build the summary from the reader's full shelf.
    pub fn from_library(profile: Profile, library: Vec<LibraryEntry>) -> Self {
        let counts = LibraryCounts::tally(library.iter().map(|item| &item.entry));
        let favorites = library
            .into_iter()
            .filter(|item| item.entry.is_favorite)
            .collect();
        Self {
            profile,
            counts,
            favorites,
        }
    }
}

impl PublicProfile {
    pub fn from_library(profile: Profile, library: Vec<LibraryEntry>) -> Self {
        let counts = LibraryCounts::tally(library.iter().map(|item| &item.entry));
        Self {
            profile,
            library,
            counts,
        }
    }
}
