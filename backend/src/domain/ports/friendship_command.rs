//! Driving port for the friend request lifecycle.
//!
//! Sending and accepting requests notify the other party. Rejecting,
//! cancelling and unfriending all delete the row and notify nobody.

use async_trait::async_trait;

use crate::domain::{Error, Friendship, FriendshipId, FriendshipStatus, Locale, UserId};

/// Domain use-case port for friendship transitions.
///
/// `locale` is the acting reader's language; notification copy is rendered
/// in it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendshipCommand: Send + Sync {
    /// Send a friend request from `requester` to `addressee`.
    ///
    /// # Errors
    /// - invalid request when the two ids are equal;
    /// - not found when the addressee does not exist;
    /// - conflict when any row already links the pair.
    async fn send_request(
        &self,
        requester: &UserId,
        addressee: &UserId,
        locale: Locale,
    ) -> Result<Friendship, Error>;

    /// Accept a pending request addressed to `user`.
    async fn accept(
        &self,
        user: &UserId,
        friendship_id: &FriendshipId,
        locale: Locale,
    ) -> Result<Friendship, Error>;

    /// Reject, cancel or unfriend. `user` must be one of the two parties.
    async fn remove(&self, user: &UserId, friendship_id: &FriendshipId) -> Result<(), Error>;
}

/// Fixture command that accepts every request and knows no existing rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFriendshipCommand;

#[async_trait]
impl FriendshipCommand for FixtureFriendshipCommand {
    async fn send_request(
        &self,
        requester: &UserId,
        addressee: &UserId,
        _locale: Locale,
    ) -> Result<Friendship, Error> {
        if requester == addressee {
            return Err(Error::invalid_request("cannot send a friend request to yourself"));
        }
        let now = chrono::Utc::now();
        Ok(Friendship {
            id: FriendshipId::random(),
            requester_id: requester.clone(),
            addressee_id: addressee.clone(),
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    async fn accept(
        &self,
        _user: &UserId,
        _friendship_id: &FriendshipId,
        _locale: Locale,
    ) -> Result<Friendship, Error> {
        Err(Error::not_found("friend request not found"))
    }

    async fn remove(&self, _user: &UserId, _friendship_id: &FriendshipId) -> Result<(), Error> {
        Err(Error::not_found("friendship not found"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_rejects_self_requests() {
        let user = UserId::random();
        let err = FixtureFriendshipCommand
            .send_request(&user, &user, Locale::Tr)
            .await
            .expect_err("self request");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn fixture_creates_pending_rows() {
        let row = FixtureFriendshipCommand
            .send_request(&UserId::random(), &UserId::random(), Locale::En)
            .await
            .expect("fixture request");
        assert_eq!(row.status, FriendshipStatus::Pending);
    }
}
