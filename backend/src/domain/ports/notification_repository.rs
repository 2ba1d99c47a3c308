//! Port for reading and acknowledging notifications.
//!
//! Notifications are only ever written as a side effect of social actions,
//! so this port has no standalone insert.

use async_trait::async_trait;

use crate::domain::{Notification, NotificationId, NotificationLimit, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
    }
}

/// Port for notification reads and read-flag updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Newest notifications for `user`.
    async fn list(
        &self,
        user: &UserId,
        limit: NotificationLimit,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;

    async fn unread_count(&self, user: &UserId) -> Result<i64, NotificationRepositoryError>;

    /// Flag one notification owned by `user` as read.
    ///
    /// Returns `false` when `user` owns no such notification.
    async fn mark_read(
        &self,
        id: &NotificationId,
        user: &UserId,
    ) -> Result<bool, NotificationRepositoryError>;

    /// Flag every unread notification of `user`; returns how many changed.
    async fn mark_all_read(&self, user: &UserId) -> Result<u64, NotificationRepositoryError>;
}
