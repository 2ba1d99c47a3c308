//! Process settings loaded via OrthoConfig.
//!
//! Values come from `SHELFMATE_*` environment variables, an optional
//! configuration file and command-line flags. Session secrets are handled
//! separately by [`crate::inbound::http::session_config`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CATALOG_BASE_URL: &str = "https://www.googleapis.com/books/v1/";
const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CATALOG_LANG: &str = "tr";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Errors raised when a configured value cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid catalog base URL '{value}': {message}")]
    CatalogBaseUrl { value: String, message: String },
}

/// Runtime configuration for the Shelfmate server.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHELFMATE")]
pub struct ShelfmateSettings {
    /// PostgreSQL connection string. Without it the server runs on fixtures.
    pub database_url: Option<String>,
    /// Listen address, `0.0.0.0:8080` by default.
    pub bind_addr: Option<String>,
    /// Comma-separated emails granted the admin dashboard.
    pub admin_emails: Option<String>,
    /// Base of the Google Books API; must end with `/`.
    pub catalog_base_url: Option<String>,
    /// Per-request catalog timeout in seconds.
    pub catalog_timeout_secs: Option<u64>,
    /// `langRestrict` sent with catalog queries.
    pub catalog_lang_restrict: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl ShelfmateSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// [`SettingsError::BindAddr`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim()
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Admin emails, trimmed with blanks skipped.
    ///
    /// # Examples
    /// ```
    /// use shelfmate::settings::ShelfmateSettings;
    ///
    /// let settings = ShelfmateSettings {
    ///     admin_emails: Some(" ada@example.org, ,grace@example.org".to_owned()),
    ///     ..ShelfmateSettings::default()
    /// };
    /// assert_eq!(settings.admin_emails(), vec!["ada@example.org", "grace@example.org"]);
    /// ```
    pub fn admin_emails(&self) -> Vec<&str> {
        self.admin_emails
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .collect()
    }

    /// Catalog base URL, with a trailing slash added when missing so
    /// relative joins stay beneath it.
    ///
    /// # Errors
    /// [`SettingsError::CatalogBaseUrl`] when the value is not an absolute URL.
    pub fn catalog_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .catalog_base_url
            .as_deref()
            .unwrap_or(DEFAULT_CATALOG_BASE_URL)
            .trim();
        let normalized = if raw.ends_with('/') {
            raw.to_owned()
        } else {
            format!("{raw}/")
        };
        Url::parse(&normalized).map_err(|err| SettingsError::CatalogBaseUrl {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(
            self.catalog_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_CATALOG_TIMEOUT_SECS),
        )
    }

    pub fn catalog_lang_restrict(&self) -> &str {
        self.catalog_lang_restrict
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .unwrap_or(DEFAULT_CATALOG_LANG)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Database URL, treating a blank value as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
