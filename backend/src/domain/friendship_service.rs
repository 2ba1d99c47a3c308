//! Friend request lifecycle.
//!
//! Sending and accepting write the friendship row and the other party's
//! notification through one repository call, which adapters commit
//! atomically.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AccountRepository, FriendshipCommand, FriendshipQuery, FriendshipRepository,
};
use crate::domain::service_errors::{friendship_exists, map_account_error, map_friendship_error};
use crate::domain::{
    Error, FriendRequest, Friendship, FriendshipId, FriendshipStatus, Locale, NewNotification,
    Profile, RelationshipStatus, Translator, UserId,
};

/// Friendship service implementing [`FriendshipCommand`] and
/// [`FriendshipQuery`].
#[derive(Clone)]
pub struct FriendshipService<F, A> {
    friendships: Arc<F>,
    accounts: Arc<A>,
}

impl<F, A> FriendshipService<F, A> {
    pub fn new(friendships: Arc<F>, accounts: Arc<A>) -> Self {
        Self {
            friendships,
            accounts,
        }
    }
}

fn request_not_found() -> Error {
    Error::not_found("friend request not found")
}

impl<F, A> FriendshipService<F, A>
where
    F: FriendshipRepository,
    A: AccountRepository,
{
    async fn find_profile(&self, user_id: &UserId) -> Result<Option<Profile>, Error> {
        self.accounts
            .find_by_id(user_id)
            .await
            .map_err(map_account_error)
    }

    async fn find_friendship(&self, id: &FriendshipId) -> Result<Option<Friendship>, Error> {
        self.friendships
            .find_by_id(id)
            .await
            .map_err(map_friendship_error)
    }
}

#[async_trait]
impl<F, A> FriendshipCommand for FriendshipService<F, A>
where
    F: FriendshipRepository,
    A: AccountRepository,
{
    async fn send_request(
        &self,
        requester: &UserId,
        addressee: &UserId,
        locale: Locale,
    ) -> Result<Friendship, Error> {
        if requester == addressee {
            return Err(Error::invalid_request(
                "you cannot send a friend request to yourself",
            ));
        }
        if self.find_profile(addressee).await?.is_none() {
            return Err(Error::not_found("user not found"));
        }
        let existing = self
            .friendships
            .find_between(requester, addressee)
            .await
            .map_err(map_friendship_error)?;
        if existing.is_some() {
            return Err(friendship_exists());
        }
        let sender = self
            .find_profile(requester)
            .await?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))?;

        let notification =
            NewNotification::friend_request(&Translator::new(locale), &sender, addressee);
        let friendship = self
            .friendships
            .create_request(requester, addressee, &notification)
            .await
            .map_err(map_friendship_error)?;
        info!(friendship_id = %friendship.id, "friend request sent");
        Ok(friendship)
    }

    async fn accept(
        &self,
        user: &UserId,
        friendship_id: &FriendshipId,
        locale: Locale,
    ) -> Result<Friendship, Error> {
        let row = self
            .find_friendship(friendship_id)
            .await?
            .filter(|row| &row.addressee_id == user)
            .ok_or_else(request_not_found)?;
        if row.status != FriendshipStatus::Pending {
            return Err(Error::conflict("friend request is no longer pending"));
        }
        let accepter = self
            .find_profile(user)
            .await?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))?;

        let notification =
            NewNotification::friend_accepted(&Translator::new(locale), &accepter, &row.requester_id);
        let accepted = self
            .friendships
            .accept(friendship_id, &notification)
            .await
            .map_err(map_friendship_error)?
            .ok_or_else(|| Error::conflict("friend request is no longer pending"))?;
        info!(friendship_id = %accepted.id, "friend request accepted");
        Ok(accepted)
    }

    async fn remove(&self, user: &UserId, friendship_id: &FriendshipId) -> Result<(), Error> {
        self.find_friendship(friendship_id)
            .await?
            .filter(|row| row.involves(user))
            .ok_or_else(request_not_found)?;
        let deleted = self
            .friendships
            .delete(friendship_id)
            .await
            .map_err(map_friendship_error)?;
        if deleted {
            Ok(())
        } else {
            Err(request_not_found())
        }
    }
}

#[async_trait]
impl<F, A> FriendshipQuery for FriendshipService<F, A>
where
    F: FriendshipRepository,
    A: AccountRepository,
{
    async fn friends(&self, user: &UserId) -> Result<Vec<Profile>, Error> {
        self.friendships
            .list_friends(user)
            .await
            .map_err(map_friendship_error)
    }

    async fn incoming_requests(&self, user: &UserId) -> Result<Vec<FriendRequest>, Error> {
        self.friendships
            .list_incoming(user)
            .await
            .map_err(map_friendship_error)
    }

    async fn relationship(
        &self,
        viewer: &UserId,
        other: &UserId,
    ) -> Result<RelationshipStatus, Error> {
        let row = self
            .friendships
            .find_between(viewer, other)
            .await
            .map_err(map_friendship_error)?;
        Ok(RelationshipStatus::derive(viewer, row.as_ref()))
    }
}

#[cfg(test)]
#[path = "friendship_service_tests.rs"]
mod tests;
