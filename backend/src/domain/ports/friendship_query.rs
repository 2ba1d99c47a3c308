//! Driving port for friendship reads.

use async_trait::async_trait;

use crate::domain::{Error, FriendRequest, Profile, RelationshipStatus, UserId};

/// Domain use-case port for reading friendships.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendshipQuery: Send + Sync {
    /// Accepted friends of `user`.
    async fn friends(&self, user: &UserId) -> Result<Vec<Profile>, Error>;

    /// Pending requests addressed to `user`, newest first.
    async fn incoming_requests(&self, user: &UserId) -> Result<Vec<FriendRequest>, Error>;

    /// How `viewer` relates to `other`.
    async fn relationship(
        &self,
        viewer: &UserId,
        other: &UserId,
    ) -> Result<RelationshipStatus, Error>;
}

/// Fixture query for a reader with no friends.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFriendshipQuery;

#[async_trait]
impl FriendshipQuery for FixtureFriendshipQuery {
    async fn friends(&self, _user: &UserId) -> Result<Vec<Profile>, Error> {
        Ok(Vec::new())
    }

    async fn incoming_requests(&self, _user: &UserId) -> Result<Vec<FriendRequest>, Error> {
        Ok(Vec::new())
    }

    async fn relationship(
        &self,
        viewer: &UserId,
        _other: &UserId,
    ) -> Result<RelationshipStatus, Error> {
        Ok(RelationshipStatus::derive(viewer, None))
    }
}
