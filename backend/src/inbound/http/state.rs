//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AdminCommand, AdminQuery, BookQuery, FixtureAccountCommand,
    FixtureAdminCommand, FixtureAdminQuery, FixtureBookQuery, FixtureFriendshipCommand,
    FixtureFriendshipQuery, FixtureLibraryCommand, FixtureLibraryQuery,
    FixtureNotificationCommand, FixtureNotificationQuery, FixtureProfileQuery,
    FixtureRecommendationCommand, FixtureRecommendationQuery, FriendshipCommand, FriendshipQuery,
    LibraryCommand, LibraryQuery, NotificationCommand, NotificationQuery, ProfileQuery,
    RecommendationCommand, RecommendationQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub books: Arc<dyn BookQuery>,
    pub library: Arc<dyn LibraryCommand>,
    pub library_query: Arc<dyn LibraryQuery>,
    pub friendships: Arc<dyn FriendshipCommand>,
    pub friendships_query: Arc<dyn FriendshipQuery>,
    pub recommendations: Arc<dyn RecommendationCommand>,
    pub recommendations_query: Arc<dyn RecommendationQuery>,
    pub notifications: Arc<dyn NotificationCommand>,
    pub notifications_query: Arc<dyn NotificationQuery>,
    pub admin: Arc<dyn AdminCommand>,
    pub admin_query: Arc<dyn AdminQuery>,
}

impl HttpStatePorts {
    /// Ports backed by the in-memory fixtures; used when no database is
    /// configured and as the baseline for handler tests.
    pub fn fixtures() -> Self {
        Self {
            accounts: Arc::new(FixtureAccountCommand),
            profiles: Arc::new(FixtureProfileQuery),
            books: Arc::new(FixtureBookQuery),
            library: Arc::new(FixtureLibraryCommand),
            library_query: Arc::new(FixtureLibraryQuery),
            friendships: Arc::new(FixtureFriendshipCommand),
            friendships_query: Arc::new(FixtureFriendshipQuery),
            recommendations: Arc::new(FixtureRecommendationCommand),
            recommendations_query: Arc::new(FixtureRecommendationQuery),
            notifications: Arc::new(FixtureNotificationCommand),
            notifications_query: Arc::new(FixtureNotificationQuery),
            admin: Arc::new(FixtureAdminCommand),
            admin_query: Arc::new(FixtureAdminQuery),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub books: Arc<dyn BookQuery>,
    pub library: Arc<dyn LibraryCommand>,
    pub library_query: Arc<dyn LibraryQuery>,
    pub friendships: Arc<dyn FriendshipCommand>,
    pub friendships_query: Arc<dyn FriendshipQuery>,
    pub recommendations: Arc<dyn RecommendationCommand>,
    pub recommendations_query: Arc<dyn RecommendationQuery>,
    pub notifications: Arc<dyn NotificationCommand>,
    pub notifications_query: Arc<dyn NotificationQuery>,
    pub admin: Arc<dyn AdminCommand>,
    pub admin_query: Arc<dyn AdminQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use shelfmate::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::fixtures());
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            profiles,
            books,
            library,
            library_query,
            friendships,
            friendships_query,
            recommendations,
            recommendations_query,
            notifications,
            notifications_query,
            admin,
            admin_query,
        } = ports;
        Self {
            accounts,
            profiles,
            books,
            library,
            library_query,
            friendships,
            friendships_query,
            recommendations,
            recommendations_query,
            notifications,
            notifications_query,
            admin,
            admin_query,
        }
    }
}
