//! In-app notifications produced by social actions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Book, BookId, MessageKey, Profile, Translator, UserId};

/// Default page size for notification listings.
pub const NOTIFICATION_LIMIT_DEFAULT: u32 = 20;
/// Largest accepted page size for notification listings.
pub const NOTIFICATION_LIMIT_MAX: u32 = 100;

/// Identifier of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
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

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of event a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FriendRequest,
    FriendAccepted,
    BookRecommendation,
}

impl NotificationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FriendRequest => "friend_request",
            Self::FriendAccepted => "friend_accepted",
            Self::BookRecommendation => "book_recommendation",
        }
    }

    pub fn from_stored(raw: &str) -> Option<Self> {
        match raw {
            "friend_request" => Some(Self::FriendRequest),
            "friend_accepted" => Some(Self::FriendAccepted),
            "book_recommendation" => Some(Self::BookRecommendation),
            _ => None,
        }
    }
}

/// Stored notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_user_id: Option<UserId>,
    pub related_book_id: Option<BookId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Notification about to be written, with its copy already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_user_id: Option<UserId>,
    pub related_book_id: Option<BookId>,
}

impl NewNotification {
    /// Tell `addressee` that `requester` wants to be friends.
    pub fn friend_request(translator: &Translator, requester: &Profile, addressee: &UserId) -> Self {
        Self {
            user_id: addressee.clone(),
            kind: NotificationKind::FriendRequest,
            title: translator.text(MessageKey::FriendRequestTitle).to_owned(),
            message: format!(
                "{} {}",
                requester.display_label(),
                translator.text(MessageKey::SentFriendRequest)
            ),
            related_user_id: Some(requester.id.clone()),
            related_book_id: None,
        }
    }

    /// Tell `requester` that `accepter` accepted their request.
    pub fn friend_accepted(translator: &Translator, accepter: &Profile, requester: &UserId) -> Self {
        Self {
            user_id: requester.clone(),
            kind: NotificationKind::FriendAccepted,
            title: translator.text(MessageKey::FriendAcceptedTitle).to_owned(),
            message: format!(
                "{} {}",
                accepter.display_label(),
                translator.text(MessageKey::AcceptedFriendRequest)
            ),
            related_user_id: Some(accepter.id.clone()),
            related_book_id: None,
        }
    }

    /// Tell `receiver` that `sender` recommended `book`.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use shelfmate::domain::{
    ///     Book, BookId, EmailAddress, Locale, NewNotification, Profile, Translator, UserId,
    /// };
    ///
    /// let sender = Profile::new(
    ///     UserId::random(),
    ///     EmailAddress::new("ada@example.org").unwrap(),
    ///     Utc::now(),
    /// );
    /// let book = Book {
    ///     id: BookId::random(),
    ///     title: "Dune".into(),
    ///     author: "Frank Herbert".into(),
    ///     cover_url: None,
    ///     isbn: None,
    ///     publisher: None,
    ///     published_date: None,
    ///     page_count: None,
    ///     description: None,
    ///     created_at: Utc::now(),
    /// };
    /// let note = NewNotification::book_recommendation(
    ///     &Translator::new(Locale::En),
    ///     &sender,
    ///     &UserId::random(),
    ///     &book,
    /// );
    /// assert_eq!(note.message, "ada recommended you a book: \"Dune\"");
    /// ```
    pub fn book_recommendation(
        translator: &Translator,
        sender: &Profile,
        receiver: &UserId,
        book: &Book,
    ) -> Self {
        Self {
            user_id: receiver.clone(),
            kind: NotificationKind::BookRecommendation,
            title: translator.text(MessageKey::BookRecommendationTitle).to_owned(),
            message: format!(
                "{} {}: \"{}\"",
                sender.display_label(),
                translator.text(MessageKey::RecommendedBook),
                book.title
            ),
            related_user_id: Some(sender.id.clone()),
            related_book_id: Some(book.id),
        }
    }
}

/// Error returned when a listing limit is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("limit must be between 1 and {NOTIFICATION_LIMIT_MAX}")]
pub struct NotificationLimitError;

/// Page size for notification listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationLimit(u32);

impl NotificationLimit {
    /// Validate an optional requested limit, defaulting when absent.
    pub fn new(requested: Option<u32>) -> Result<Self, NotificationLimitError> {
        match requested {
            None => Ok(Self::default()),
            Some(value) if (1..=NOTIFICATION_LIMIT_MAX).contains(&value) => Ok(Self(value)),
            Some(_) => Err(NotificationLimitError),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for NotificationLimit {
    fn default() -> Self {
        Self(NOTIFICATION_LIMIT_DEFAULT)
    }
}
