//! Builders wiring Diesel repositories and domain services into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use shelfmate::domain::ports::{BookCatalogSource, FixtureBookCatalogSource};
use shelfmate::domain::{
    AccountService, AdminPolicy, AdminService, BookService, FriendshipService, LibraryService,
    NotificationService, RecommendationService,
};
use shelfmate::inbound::http::state::{HttpState, HttpStatePorts};
use shelfmate::outbound::catalog::GoogleBooksHttpSource;
use shelfmate::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselAdminRepository, DieselBookRepository,
    DieselFriendshipRepository, DieselLibraryRepository, DieselNotificationRepository,
    DieselRecommendationRepository,
};

use super::ServerConfig;

/// Use database-backed ports when a pool is available, otherwise the
/// in-memory fixtures.
fn build_ports_with_pool<Pool>(
    pool: &Option<Pool>,
    make_ports: impl FnOnce(&Pool) -> HttpStatePorts,
) -> HttpStatePorts {
    match pool {
        Some(pool) => make_ports(pool),
        None => HttpStatePorts::fixtures(),
    }
}

/// One Diesel repository per port, all sharing the same pool.
struct Repositories {
    accounts: Arc<DieselAccountRepository>,
    books: Arc<DieselBookRepository>,
    library: Arc<DieselLibraryRepository>,
    friendships: Arc<DieselFriendshipRepository>,
    recommendations: Arc<DieselRecommendationRepository>,
    notifications: Arc<DieselNotificationRepository>,
    admin: Arc<DieselAdminRepository>,
}

impl Repositories {
    fn new(pool: &DbPool) -> Self {
        Self {
            accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
            books: Arc::new(DieselBookRepository::new(pool.clone())),
            library: Arc::new(DieselLibraryRepository::new(pool.clone())),
            friendships: Arc::new(DieselFriendshipRepository::new(pool.clone())),
            recommendations: Arc::new(DieselRecommendationRepository::new(pool.clone())),
            notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
            admin: Arc::new(DieselAdminRepository::new(pool.clone())),
        }
    }
}

fn build_db_ports<C>(
    pool: &DbPool,
    catalog: Arc<C>,
    policy: Arc<AdminPolicy>,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    C: BookCatalogSource + 'static,
{
    let repos = Repositories::new(pool);

    let accounts = Arc::new(AccountService::new(
        repos.accounts.clone(),
        repos.library.clone(),
        policy.clone(),
    ));
    let library = Arc::new(LibraryService::new(
        repos.library.clone(),
        repos.books.clone(),
        catalog.clone(),
    ));
    let friendships = Arc::new(FriendshipService::new(
        repos.friendships.clone(),
        repos.accounts.clone(),
    ));
    let recommendations = Arc::new(RecommendationService::new(
        repos.recommendations,
        repos.friendships,
        repos.accounts.clone(),
        repos.books.clone(),
    ));
    let notifications = Arc::new(NotificationService::new(repos.notifications));
    let admin = Arc::new(AdminService::new(
        repos.accounts,
        repos.books.clone(),
        repos.admin,
        policy,
        clock,
    ));

    HttpStatePorts {
        accounts: accounts.clone(),
        profiles: accounts,
        books: Arc::new(BookService::new(repos.books, catalog)),
        library: library.clone(),
        library_query: library,
        friendships: friendships.clone(),
        friendships_query: friendships,
        recommendations: recommendations.clone(),
        recommendations_query: recommendations,
        notifications: notifications.clone(),
        notifications_query: notifications,
        admin: admin.clone(),
        admin_query: admin,
    }
}

/// Assemble the HTTP state for the configured backends.
///
/// # Errors
/// Returns [`std::io::Error`] when the catalog HTTP client cannot be built.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let policy = config.admin_policy.clone();
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match &config.catalog {
        Some(catalog) => {
            let source = GoogleBooksHttpSource::new(
                catalog.base_url.clone(),
                catalog.timeout,
                catalog.lang_restrict.clone(),
            )
            .map_err(|err| std::io::Error::other(format!("catalog client: {err}")))?;
            let source = Arc::new(source);
            build_ports_with_pool(&config.db_pool, |pool| {
                build_db_ports(pool, source, policy, clock)
            })
        }
        None => build_ports_with_pool(&config.db_pool, |pool| {
            build_db_ports(pool, Arc::new(FixtureBookCatalogSource), policy, clock)
        }),
    };
    if config.db_pool.is_none() {
        info!("no database configured; serving fixture data");
    }
    Ok(web::Data::new(HttpState::new(ports)))
}
