//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use shelfmate::domain::AdminPolicy;
use shelfmate::outbound::persistence::DbPool;
use url::Url;

/// Google Books adapter settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) lang_restrict: String,
}

impl CatalogConfig {
    #[must_use]
    pub fn new(base_url: Url, timeout: Duration, lang_restrict: impl Into<String>) -> Self {
        Self {
            base_url,
            timeout,
            lang_restrict: lang_restrict.into(),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) catalog: Option<CatalogConfig>,
    pub(crate) admin_policy: Arc<AdminPolicy>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            catalog: None,
            admin_policy: Arc::new(AdminPolicy::default()),
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, every port is served by the Diesel repositories and
    /// domain services; otherwise the in-memory fixtures answer.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Configure the catalog adapter used for Google Books lookups.
    #[must_use]
    pub fn with_catalog(mut self, catalog: CatalogConfig) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Emails allowed onto the admin dashboard.
    #[must_use]
    pub fn with_admin_policy(mut self, policy: AdminPolicy) -> Self {
        self.admin_policy = Arc::new(policy);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
