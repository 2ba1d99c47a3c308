//! Internal Diesel row structs and their conversion into domain types.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Book, BookId, EmailAddress, Friendship, FriendshipId, FriendshipStatus, NewBook,
    Notification, NotificationId, NotificationKind, Profile, Rating, ReadingStatus,
    Recommendation, RecommendationId, UserBook, UserId,
};

use super::schema::{book_recommendations, books, friendships, notifications, profiles, user_books};

/// A stored row that no longer satisfies a domain invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {table} row is invalid: {reason}")]
pub(crate) struct InvalidRow {
    table: &'static str,
    reason: String,
}

impl InvalidRow {
    fn new(table: &'static str, reason: impl Into<String>) -> Self {
        Self {
            table,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = InvalidRow;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let email =
            EmailAddress::new(&row.email).map_err(|err| InvalidRow::new("profiles", err.to_string()))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email,
            full_name: row.full_name,
            avatar_url: row.avatar_url,
            bio: row.bio,
            location: row.location,
            website: row.website,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: Option<&'a str>,
}

/// Settings-form changeset; `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = profiles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfileChangeset<'a> {
    pub full_name: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub location: Option<&'a str>,
    pub website: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookRow {
    pub id: Uuid,
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

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: BookId::from_uuid(row.id),
            title: row.title,
            author: row.author,
            cover_url: row.cover_url,
            isbn: row.isbn,
            publisher: row.publisher,
            published_date: row.published_date,
            page_count: row.page_count,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = books)]
pub(crate) struct NewBookRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub normalized_title: String,
    pub author: &'a str,
    pub cover_url: Option<&'a str>,
    pub isbn: Option<&'a str>,
    pub publisher: Option<&'a str>,
    pub published_date: Option<&'a str>,
    pub page_count: Option<i32>,
    pub description: Option<&'a str>,
}

impl<'a> NewBookRow<'a> {
    pub fn from_domain(id: Uuid, book: &'a NewBook) -> Self {
        Self {
            id,
            title: &book.title,
            normalized_title: book.normalized_title(),
            author: &book.author,
            cover_url: book.cover_url.as_deref(),
            isbn: book.isbn.as_deref(),
            publisher: book.publisher.as_deref(),
            published_date: book.published_date.as_deref(),
            page_count: book.page_count,
            description: book.description.as_deref(),
        }
    }
}

/// Full replacement of a book's content; `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = books)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BookChangeset<'a> {
    pub title: &'a str,
    pub normalized_title: String,
    pub author: &'a str,
    pub cover_url: Option<&'a str>,
    pub isbn: Option<&'a str>,
    pub publisher: Option<&'a str>,
    pub published_date: Option<&'a str>,
    pub page_count: Option<i32>,
    pub description: Option<&'a str>,
}

impl<'a> From<&'a NewBook> for BookChangeset<'a> {
    fn from(book: &'a NewBook) -> Self {
        Self {
            title: &book.title,
            normalized_title: book.normalized_title(),
            author: &book.author,
            cover_url: book.cover_url.as_deref(),
            isbn: book.isbn.as_deref(),
            publisher: book.publisher.as_deref(),
            published_date: book.published_date.as_deref(),
            page_count: book.page_count,
            description: book.description.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Shelf entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_books)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserBookRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub status: String,
    pub rating: Option<i16>,
    pub notes: Option<String>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserBookRow> for UserBook {
    type Error = InvalidRow;

    fn try_from(row: UserBookRow) -> Result<Self, Self::Error> {
        let status: ReadingStatus = row
            .status
            .parse()
            .map_err(|_| InvalidRow::new("user_books", format!("status {}", row.status)))?;
        let rating = row
            .rating
            .map(Rating::try_from)
            .transpose()
            .map_err(|err| InvalidRow::new("user_books", err.to_string()))?;
        Ok(Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            book_id: BookId::from_uuid(row.book_id),
            status,
            rating,
            notes: row.notes,
            is_favorite: row.is_favorite,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_books)]
pub(crate) struct NewUserBookRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub book_id: Uuid,
    pub status: &'a str,
}

// ---------------------------------------------------------------------------
// Friendships
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = friendships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FriendshipRow {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<FriendshipRow> for Friendship {
    type Error = InvalidRow;

    fn try_from(row: FriendshipRow) -> Result<Self, Self::Error> {
        let status = FriendshipStatus::from_stored(&row.status)
            .ok_or_else(|| InvalidRow::new("friendships", format!("status {}", row.status)))?;
        Ok(Self {
            id: FriendshipId::from_uuid(row.id),
            requester_id: UserId::from_uuid(row.requester_id),
            addressee_id: UserId::from_uuid(row.addressee_id),
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = friendships)]
pub(crate) struct NewFriendshipRow<'a> {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: &'a str,
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = book_recommendations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecommendationRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub book_id: Uuid,
    pub message: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<RecommendationRow> for Recommendation {
    fn from(row: RecommendationRow) -> Self {
        Self {
            id: RecommendationId::from_uuid(row.id),
            sender_id: UserId::from_uuid(row.sender_id),
            receiver_id: UserId::from_uuid(row.receiver_id),
            book_id: BookId::from_uuid(row.book_id),
            message: row.message,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = book_recommendations)]
pub(crate) struct NewRecommendationRow<'a> {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub book_id: Uuid,
    pub message: Option<&'a str>,
    pub is_read: bool,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub related_user_id: Option<Uuid>,
    pub related_book_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = InvalidRow;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind = NotificationKind::from_stored(&row.kind)
            .ok_or_else(|| InvalidRow::new("notifications", format!("type {}", row.kind)))?;
        Ok(Self {
            id: NotificationId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            kind,
            title: row.title,
            message: row.message,
            related_user_id: row.related_user_id.map(UserId::from_uuid),
            related_book_id: row.related_book_id.map(BookId::from_uuid),
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: &'a str,
    pub title: &'a str,
    pub message: &'a str,
    pub related_user_id: Option<Uuid>,
    pub related_book_id: Option<Uuid>,
}

impl<'a> NewNotificationRow<'a> {
    pub fn from_domain(notification: &'a crate::domain::NewNotification) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: *notification.user_id.as_uuid(),
            kind: notification.kind.as_str(),
            title: &notification.title,
            message: &notification.message,
            related_user_id: notification.related_user_id.as_ref().map(|id| *id.as_uuid()),
            related_book_id: notification.related_book_id.map(|id| *id.as_uuid()),
        }
    }
}
