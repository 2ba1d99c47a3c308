//! Port for friendship rows and the notifications they emit.
//!
//! Writes that also notify a reader take the notification as an argument so
//! adapters can commit both rows in one transaction.

use async_trait::async_trait;

use crate::domain::{Friendship, FriendshipId, FriendRequest, NewNotification, Profile, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by friendship repository adapters.
    pub enum FriendshipRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "friendship repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "friendship repository query failed: {message}",
        /// A row already links the two readers.
        AlreadyExists { message: String } =>
            "friendship already exists: {message}",
    }
}

/// Port for friendship persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// Row linking the two readers in either direction.
    async fn find_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError>;

    async fn find_by_id(
        &self,
        id: &FriendshipId,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError>;

    /// Insert a pending request and notify the addressee atomically.
    ///
    /// Fails with [`FriendshipRepositoryError::AlreadyExists`] when any row
    /// links the pair.
    async fn create_request(
        &self,
        requester: &UserId,
        addressee: &UserId,
        notification: &NewNotification,
    ) -> Result<Friendship, FriendshipRepositoryError>;

    /// Accept a pending request and notify the requester atomically.
    ///
    /// Returns `None` when the row is no longer pending.
    async fn accept(
        &self,
        id: &FriendshipId,
        notification: &NewNotification,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError>;

    /// Returns `false` when there was no row to delete.
    async fn delete(&self, id: &FriendshipId) -> Result<bool, FriendshipRepositoryError>;

    /// Profiles of accepted friends, ordered by display name.
    async fn list_friends(&self, user: &UserId)
    -> Result<Vec<Profile>, FriendshipRepositoryError>;

    /// Pending requests addressed to `user`, newest first.
    async fn list_incoming(
        &self,
        user: &UserId,
    ) -> Result<Vec<FriendRequest>, FriendshipRepositoryError>;
}
