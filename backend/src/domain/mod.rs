//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, the ports that connect them, and the services implementing the
//! driving ports. Types document their invariants and serialisation contract
//! (camelCase JSON) in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - Profile, Book, UserBook, Friendship, Recommendation, Notification: the
//!   stored aggregates.
//! - Locale / Translator: server-side localisation.
//! - `*Service` types: implementations of the driving ports in [`ports`].

pub mod admin;
pub mod auth;
pub mod book;
pub mod error;
pub mod friendship;
pub mod library;
pub mod localization;
pub mod notification;
pub mod ports;
pub mod recommendation;
pub mod search;
pub mod trace_id;
pub mod user;

mod account_service;
mod admin_service;
mod book_service;
mod friendship_service;
mod library_service;
mod notification_service;
mod recommendation_service;
mod service_errors;

pub use self::account_service::AccountService;
pub use self::admin::{
    ADMIN_USER_BOOKS_LIMIT, AdminPolicy, AdminUserSummary, DashboardStats, DashboardTotals,
    LEADERBOARD_LIMIT, RECENT_ACTIVITY_LIMIT, TopBook, TopUser, month_start,
};
pub use self::admin_service::AdminService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MAX, PASSWORD_MIN, PasswordDigest,
    PasswordDigestError, Registration, SessionProfile,
};
pub use self::book::{
    Book, BookDraft, BookId, BookRef, BookSource, BookSummary, BookValidationError,
    CatalogVolume, EXTERNAL_ID_PREFIX, ExternalVolumeId, NewBook, normalize_title,
};
pub use self::book_service::BookService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::friendship::{
    FriendRequest, Friendship, FriendshipId, FriendshipStatus, RelationshipStatus,
    RelationshipView,
};
pub use self::friendship_service::FriendshipService;
pub use self::library::{
    ActivityEntry, AddOutcome, FEED_LIMIT, LibraryCounts, LibraryEntry, LibraryValidationError,
    NOTES_MAX, ProfileSummary, PublicProfile, Rating, ReadingStatus, ReviewUpdate, StatusChange,
    UserBook,
};
pub use self::library_service::LibraryService;
pub use self::localization::{Locale, MessageKey, Translator, UnsupportedLocaleError};
pub use self::notification::{
    NOTIFICATION_LIMIT_DEFAULT, NOTIFICATION_LIMIT_MAX, NewNotification, Notification,
    NotificationId, NotificationKind, NotificationLimit, NotificationLimitError,
};
pub use self::notification_service::NotificationService;
pub use self::recommendation::{
    NewRecommendation, RECOMMENDATION_MESSAGE_MAX, ReceivedRecommendation, Recommendation,
    RecommendationId, RecommendationValidationError,
};
pub use self::recommendation_service::RecommendationService;
pub use self::search::{
    CATALOG_RESULT_LIMIT, LOCAL_RESULT_THRESHOLD, LOCAL_SEARCH_LIMIT, SEARCH_MIN_CHARS,
    SearchQuery, USER_SEARCH_LIMIT, local_results_suffice, merge_results,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    BIO_MAX, EmailAddress, FULL_NAME_MAX, Profile, ProfileUpdate, ProfileUpdateDraft, UserId,
    UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use shelfmate::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
