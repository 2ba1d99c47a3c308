//! Notification inbox service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{NotificationCommand, NotificationQuery, NotificationRepository};
use crate::domain::service_errors::map_notification_error;
use crate::domain::{Error, Notification, NotificationId, NotificationLimit, UserId};

/// Notification service implementing [`NotificationCommand`] and
/// [`NotificationQuery`].
#[derive(Clone)]
pub struct NotificationService<N> {
    notifications: Arc<N>,
}

impl<N> NotificationService<N> {
    pub fn new(notifications: Arc<N>) -> Self {
        Self { notifications }
    }
}

#[async_trait]
impl<N> NotificationCommand for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn mark_read(&self, user: &UserId, id: &NotificationId) -> Result<(), Error> {
        let updated = self
            .notifications
            .mark_read(id, user)
            .await
            .map_err(map_notification_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found("notification not found"))
        }
    }

    async fn mark_all_read(&self, user: &UserId) -> Result<u64, Error> {
        let changed = self
            .notifications
            .mark_all_read(user)
            .await
            .map_err(map_notification_error)?;
        debug!(user_id = %user, changed, "inbox marked read");
        Ok(changed)
    }
}

#[async_trait]
impl<N> NotificationQuery for NotificationService<N>
where
    N: NotificationRepository,
{
    async fn list(
        &self,
        user: &UserId,
        limit: NotificationLimit,
    ) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list(user, limit)
            .await
            .map_err(map_notification_error)
    }

    async fn unread_count(&self, user: &UserId) -> Result<i64, Error> {
        self.notifications
            .unread_count(user)
            .await
            .map_err(map_notification_error)
    }
}
