//! Backend entry-point: loads settings, applies migrations and serves the
//! REST API with its OpenAPI docs.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use shelfmate::domain::AdminPolicy;
use shelfmate::inbound::http::health::HealthState;
use shelfmate::inbound::http::session_config::fingerprint::key_fingerprint;
use shelfmate::inbound::http::session_config::{BuildMode, session_settings_from_env};
use shelfmate::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use shelfmate::settings::ShelfmateSettings;

use server::{CatalogConfig, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ShelfmateSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;

    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| io::Error::other(err.to_string()))?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session signing key loaded"
    );

    let bind_addr = settings
        .bind_addr()
        .map_err(|err| io::Error::other(err.to_string()))?;
    let catalog = CatalogConfig::new(
        settings
            .catalog_base_url()
            .map_err(|err| io::Error::other(err.to_string()))?,
        settings.catalog_timeout(),
        settings.catalog_lang_restrict(),
    );
    let admin_policy = AdminPolicy::from_emails(settings.admin_emails());
    if admin_policy.is_empty() {
        warn!("no admin emails configured; the admin dashboard is unreachable");
    } else {
        info!(admins = admin_policy.len(), "admin policy loaded");
    }

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_catalog(catalog)
    .with_admin_policy(admin_policy);

    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(database_url)
            .await
            .map_err(|err| io::Error::other(err.to_string()))?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .map_err(|err| io::Error::other(err.to_string()))?;
        config = config.with_db_pool(pool);
    } else {
        warn!("SHELFMATE_DATABASE_URL not set; running against fixtures");
    }

    info!(%bind_addr, "starting server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
