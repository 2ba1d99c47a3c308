//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers depend only on the driving ports bundled in [`state::HttpState`];
//! session and language handling live in [`session`] and [`locale`].

pub mod accounts;
pub mod admin;
pub mod books;
pub mod cache_control;
pub mod error;
pub mod friends;
pub mod health;
pub mod library;
pub mod locale;
pub mod notifications;
pub mod profiles;
pub mod recommendations;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
