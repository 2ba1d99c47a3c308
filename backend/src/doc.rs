//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, the
//! schema wrappers from [`crate::inbound::http::schemas`] and the session
//! cookie security scheme. Domain types stay free of utoipa derives.
//!
//! The document is served by Swagger UI in debug builds and exported with
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::accounts::{LanguageRequest, LanguageResponse, LoginRequest, SignupRequest};
use crate::inbound::http::admin::BookRequest;
use crate::inbound::http::friends::FriendRequestBody;
use crate::inbound::http::library::{
    AddToLibraryRequest, FavoriteRequest, ReviewRequest, StatusRequest,
};
use crate::inbound::http::notifications::{MarkAllReadResponse, UnreadCountResponse};
use crate::inbound::http::profiles::ProfileUpdateRequest;
use crate::inbound::http::recommendations::RecommendRequest;
use crate::inbound::http::schemas::{
    AdminUserSummarySchema, BookSchema, BookSummarySchema, DashboardStatsSchema, ErrorCodeSchema,
    ErrorSchema, FriendRequestSchema, FriendshipSchema, LibraryCountsSchema, LibraryEntrySchema,
    NotificationSchema, ProfileSchema, ProfileSummarySchema, PublicProfileSchema,
    ReceivedRecommendationSchema, RecommendationSchema, RelationshipStatusSchema,
    SessionProfileSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/signup.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Shelfmate API",
        description = "Reading lists, friends, recommendations and notifications for readers, \
                       plus an admin dashboard."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::signup,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_session,
        crate::inbound::http::accounts::set_language,
        crate::inbound::http::profiles::own_profile,
        crate::inbound::http::profiles::update_profile,
        crate::inbound::http::profiles::profile_summary,
        crate::inbound::http::profiles::public_profile,
        crate::inbound::http::profiles::search_users,
        crate::inbound::http::books::get_book,
        crate::inbound::http::books::search_books,
        crate::inbound::http::library::add_to_library,
        crate::inbound::http::library::list_library,
        crate::inbound::http::library::get_entry,
        crate::inbound::http::library::change_status,
        crate::inbound::http::library::review,
        crate::inbound::http::library::set_favorite,
        crate::inbound::http::library::feed,
        crate::inbound::http::friends::list_friends,
        crate::inbound::http::friends::incoming_requests,
        crate::inbound::http::friends::relationship_status,
        crate::inbound::http::friends::send_request,
        crate::inbound::http::friends::accept_request,
        crate::inbound::http::friends::remove_friendship,
        crate::inbound::http::recommendations::recommend,
        crate::inbound::http::recommendations::received,
        crate::inbound::http::recommendations::mark_read,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::unread_count,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::admin::stats,
        crate::inbound::http::admin::list_books,
        crate::inbound::http::admin::create_book,
        crate::inbound::http::admin::update_book,
        crate::inbound::http::admin::delete_book,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::user_books,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ProfileSchema,
        SessionProfileSchema,
        BookSchema,
        BookSummarySchema,
        LibraryEntrySchema,
        LibraryCountsSchema,
        PublicProfileSchema,
        ProfileSummarySchema,
        FriendshipSchema,
        FriendRequestSchema,
        RelationshipStatusSchema,
        RecommendationSchema,
        ReceivedRecommendationSchema,
        NotificationSchema,
        DashboardStatsSchema,
        AdminUserSummarySchema,
        SignupRequest,
        LoginRequest,
        LanguageRequest,
        LanguageResponse,
        ProfileUpdateRequest,
        AddToLibraryRequest,
        StatusRequest,
        ReviewRequest,
        FavoriteRequest,
        FriendRequestBody,
        RecommendRequest,
        UnreadCountResponse,
        MarkAllReadResponse,
        BookRequest,
    )),
    tags(
        (name = "accounts", description = "Sign up, sign in and session language"),
        (name = "profiles", description = "Own and public reader profiles"),
        (name = "books", description = "Book detail and catalog search"),
        (name = "library", description = "Personal shelves, reviews and the home feed"),
        (name = "friends", description = "Friend requests and friendships"),
        (name = "recommendations", description = "Book recommendations between friends"),
        (name = "notifications", description = "Notification inbox"),
        (name = "admin", description = "Admin dashboard"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
