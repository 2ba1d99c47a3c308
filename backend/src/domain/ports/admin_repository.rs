//! Port for admin dashboard aggregates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AdminUserSummary, DashboardStats, LibraryEntry, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by admin repository adapters.
    pub enum AdminRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "admin repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "admin repository query failed: {message}",
    }
}

/// Port for cross-reader aggregate reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Dashboard totals, recent activity and leaderboards. Monthly counts
    /// include rows created at or after `month_start`.
    async fn dashboard(
        &self,
        month_start: DateTime<Utc>,
    ) -> Result<DashboardStats, AdminRepositoryError>;

    /// Every profile with shelf statistics, newest first.
    async fn list_users(&self) -> Result<Vec<AdminUserSummary>, AdminRepositoryError>;

    /// Most recently updated entries on one reader's shelf.
    async fn recent_user_books(
        &self,
        user: &UserId,
        limit: i64,
    ) -> Result<Vec<LibraryEntry>, AdminRepositoryError>;
}
