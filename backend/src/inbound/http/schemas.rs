//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the camelCase JSON of their domain types but
//! live in the inbound adapter layer where framework concerns belong.

use serde::Serialize;
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state, such as a duplicate email.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database or the book catalog is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "email must be a valid address")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Profile`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Profile)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSchema {
    #[schema(example = "123e4567-e89b-12d3-a456-426614174000")]
    id: String,
    #[schema(example = "ada@example.org")]
    email: String,
    #[schema(example = "Ada Lovelace")]
    full_name: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
    location: Option<String>,
    website: Option<String>,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::SessionProfile`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::SessionProfile)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfileSchema {
    #[serde(flatten)]
    profile: ProfileSchema,
    /// Whether the reader's email is on the configured admin list.
    is_admin: bool,
    #[schema(example = "tr")]
    language: String,
}

/// OpenAPI schema for [`crate::domain::Book`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Book)]
#[serde(rename_all = "camelCase")]
pub struct BookSchema {
    #[schema(example = "9b2f6a0e-4c1d-4f2e-8a57-3c6d1e0b7a42")]
    id: String,
    #[schema(example = "Kürk Mantolu Madonna")]
    title: String,
    #[schema(example = "Sabahattin Ali")]
    author: String,
    cover_url: Option<String>,
    isbn: Option<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    page_count: Option<i32>,
    description: Option<String>,
    #[schema(format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::BookSummary`].
///
/// Search results and detail pages; `id` is a UUID for local books and
/// `google_<volumeId>` for catalog volumes.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::BookSummary)]
#[serde(rename_all = "camelCase")]
pub struct BookSummarySchema {
    #[schema(example = "google_zyTCAlFPjgYC")]
    id: String,
    title: String,
    author: String,
    cover_url: Option<String>,
    isbn: Option<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    page_count: Option<i32>,
    description: Option<String>,
    #[schema(example = "local")]
    source: String,
}

/// OpenAPI schema for [`crate::domain::LibraryEntry`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::LibraryEntry)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntrySchema {
    id: String,
    user_id: String,
    book_id: String,
    #[schema(example = "want_to_read")]
    status: String,
    #[schema(minimum = 1, maximum = 5)]
    rating: Option<i16>,
    notes: Option<String>,
    is_favorite: bool,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    updated_at: String,
    book: BookSchema,
}

/// OpenAPI schema for [`crate::domain::LibraryCounts`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::LibraryCounts)]
#[serde(rename_all = "camelCase")]
pub struct LibraryCountsSchema {
    want_to_read: i64,
    reading: i64,
    finished: i64,
    favorites: i64,
    total: i64,
}

/// OpenAPI schema for [`crate::domain::PublicProfile`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::PublicProfile)]
pub struct PublicProfileSchema {
    profile: ProfileSchema,
    library: Vec<LibraryEntrySchema>,
    counts: LibraryCountsSchema,
}

/// OpenAPI schema for [`crate::domain::ProfileSummary`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ProfileSummary)]
pub struct ProfileSummarySchema {
    profile: ProfileSchema,
    counts: LibraryCountsSchema,
    favorites: Vec<LibraryEntrySchema>,
}

/// OpenAPI schema for [`crate::domain::Friendship`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Friendship)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipSchema {
    id: String,
    requester_id: String,
    addressee_id: String,
    #[schema(example = "pending")]
    status: String,
    #[schema(format = DateTime)]
    created_at: String,
    #[schema(format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::FriendRequest`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::FriendRequest)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestSchema {
    id: String,
    #[schema(format = DateTime)]
    created_at: String,
    requester: ProfileSchema,
}

/// OpenAPI schema for [`crate::domain::RelationshipStatus`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::RelationshipStatus)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipStatusSchema {
    /// One of `none`, `pending_sent`, `pending_received`, `friends`, `blocked`.
    #[schema(example = "pending_sent")]
    status: String,
    friendship_id: Option<String>,
}

/// OpenAPI schema for [`crate::domain::Recommendation`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Recommendation)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSchema {
    id: String,
    sender_id: String,
    receiver_id: String,
    book_id: String,
    message: Option<String>,
    is_read: bool,
    #[schema(format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::ReceivedRecommendation`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::ReceivedRecommendation)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedRecommendationSchema {
    #[serde(flatten)]
    recommendation: RecommendationSchema,
    sender: ProfileSchema,
    book: BookSchema,
}

/// OpenAPI schema for [`crate::domain::Notification`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Notification)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSchema {
    id: String,
    user_id: String,
    /// One of `friend_request`, `friend_accepted`, `book_recommendation`.
    #[serde(rename = "type")]
    #[schema(example = "friend_accepted")]
    kind: String,
    title: String,
    message: String,
    related_user_id: Option<String>,
    related_book_id: Option<String>,
    is_read: bool,
    #[schema(format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::DashboardStats`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::DashboardStats)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsSchema {
    /// Totals, status counts and this month's sign-ups and new books.
    totals: serde_json::Value,
    recent_activity: Vec<serde_json::Value>,
    top_books: Vec<serde_json::Value>,
    top_users: Vec<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::AdminUserSummary`].
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::AdminUserSummary)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserSummarySchema {
    profile: ProfileSchema,
    book_count: i64,
    rating_count: i64,
    favorite_count: i64,
}
