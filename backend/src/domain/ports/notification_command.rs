//! Driving ports for the notification inbox.

use async_trait::async_trait;

use crate::domain::{Error, Notification, NotificationId, NotificationLimit, UserId};

/// Domain use-case port for acknowledging notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationCommand: Send + Sync {
    /// Mark one notification read; other readers' notifications are not
    /// found.
    async fn mark_read(&self, user: &UserId, id: &NotificationId) -> Result<(), Error>;

    /// Mark the whole inbox read and return how many notifications changed.
    async fn mark_all_read(&self, user: &UserId) -> Result<u64, Error>;
}

/// Domain use-case port for reading the inbox.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQuery: Send + Sync {
    async fn list(
        &self,
        user: &UserId,
        limit: NotificationLimit,
    ) -> Result<Vec<Notification>, Error>;

    async fn unread_count(&self, user: &UserId) -> Result<i64, Error>;
}

/// Fixture command for an empty inbox.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationCommand;

#[async_trait]
impl NotificationCommand for FixtureNotificationCommand {
    async fn mark_read(&self, _user: &UserId, _id: &NotificationId) -> Result<(), Error> {
        Err(Error::not_found("notification not found"))
    }

    async fn mark_all_read(&self, _user: &UserId) -> Result<u64, Error> {
        Ok(0)
    }
}

/// Fixture query for an empty inbox.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNotificationQuery;

#[async_trait]
impl NotificationQuery for FixtureNotificationQuery {
    async fn list(
        &self,
        _user: &UserId,
        _limit: NotificationLimit,
    ) -> Result<Vec<Notification>, Error> {
        Ok(Vec::new())
    }

    async fn unread_count(&self, _user: &UserId) -> Result<i64, Error> {
        Ok(0)
    }
}
