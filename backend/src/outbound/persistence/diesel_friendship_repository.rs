//! PostgreSQL-backed `FriendshipRepository`.
//!
//! Request and accept commit the friendship change and the notification for
//! the other reader in one transaction. The `friendships_pair_key` index keeps
//! one row per unordered pair; the in-transaction pre-check only turns the
//! common case into a clean `AlreadyExists` before the index fires.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{FriendshipRepository, FriendshipRepositoryError};
use crate::domain::{
    FriendRequest, Friendship, FriendshipId, FriendshipStatus, NewNotification, Profile, UserId,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{FriendshipRow, NewFriendshipRow, NewNotificationRow, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::{friendships, notifications, profiles};

const PAIR_UNIQUE_INDEX: &str = "friendships_pair_key";

/// Diesel-backed implementation of the [`FriendshipRepository`] port.
#[derive(Clone)]
pub struct DieselFriendshipRepository {
    pool: DbPool,
}

impl DieselFriendshipRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a write transaction.
#[derive(Debug)]
enum WriteError {
    Diesel(DieselError),
    PairTaken,
}

impl From<DieselError> for WriteError {
    fn from(error: DieselError) -> Self {
        if is_unique_violation(&error, Some(PAIR_UNIQUE_INDEX)) {
            Self::PairTaken
        } else {
            Self::Diesel(error)
        }
    }
}

fn map_pool_error(error: PoolError) -> FriendshipRepositoryError {
    map_basic_pool_error(error, |message| FriendshipRepositoryError::connection(message))
}

fn map_diesel_error(error: DieselError) -> FriendshipRepositoryError {
    map_basic_diesel_error(
        error,
        FriendshipRepositoryError::query,
        FriendshipRepositoryError::connection,
    )
}

fn map_write_error(error: WriteError) -> FriendshipRepositoryError {
    match error {
        WriteError::Diesel(error) => map_diesel_error(error),
        WriteError::PairTaken => {
            FriendshipRepositoryError::already_exists("a friendship row exists for this pair")
        }
    }
}

fn to_friendship(row: FriendshipRow) -> Result<Friendship, FriendshipRepositoryError> {
    Friendship::try_from(row).map_err(|err| FriendshipRepositoryError::query(err.to_string()))
}

fn to_profile(row: ProfileRow) -> Result<Profile, FriendshipRepositoryError> {
    Profile::try_from(row).map_err(|err| FriendshipRepositoryError::query(err.to_string()))
}

async fn row_between(
    conn: &mut AsyncPgConnection,
    a: Uuid,
    b: Uuid,
) -> Result<Option<FriendshipRow>, DieselError> {
    friendships::table
        .filter(
            friendships::requester_id
                .eq(a)
                .and(friendships::addressee_id.eq(b))
                .or(friendships::requester_id
                    .eq(b)
                    .and(friendships::addressee_id.eq(a))),
        )
        .select(FriendshipRow::as_select())
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl FriendshipRepository for DieselFriendshipRepository {
    async fn find_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        row_between(&mut conn, *a.as_uuid(), *b.as_uuid())
            .await
            .map_err(map_diesel_error)?
            .map(to_friendship)
            .transpose()
    }

    async fn find_by_id(
        &self,
        id: &FriendshipId,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        friendships::table
            .find(id.as_uuid())
            .select(FriendshipRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_friendship)
            .transpose()
    }

    async fn create_request(
        &self,
        requester: &UserId,
        addressee: &UserId,
        notification: &NewNotification,
    ) -> Result<Friendship, FriendshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewFriendshipRow {
            id: Uuid::new_v4(),
            requester_id: *requester.as_uuid(),
            addressee_id: *addressee.as_uuid(),
            status: FriendshipStatus::Pending.as_str(),
        };
        let notification_row = NewNotificationRow::from_domain(notification);

        let created = conn
            .transaction::<_, WriteError, _>(|conn| {
                async move {
                    if row_between(conn, row.requester_id, row.addressee_id)
                        .await?
                        .is_some()
                    {
                        return Err(WriteError::PairTaken);
                    }
                    let created = diesel::insert_into(friendships::table)
                        .values(&row)
                        .returning(FriendshipRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(notifications::table)
                        .values(&notification_row)
                        .execute(conn)
                        .await?;
                    Ok(created)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_write_error)?;
        debug!(friendship_id = %created.id, "friend request stored with notification");
        to_friendship(created)
    }

    async fn accept(
        &self,
        id: &FriendshipId,
        notification: &NewNotification,
    ) -> Result<Option<Friendship>, FriendshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let friendship_id = *id.as_uuid();
        let notification_row = NewNotificationRow::from_domain(notification);

        let accepted = conn
            .transaction::<_, WriteError, _>(|conn| {
                async move {
                    let updated = diesel::update(
                        friendships::table
                            .find(friendship_id)
                            .filter(friendships::status.eq(FriendshipStatus::Pending.as_str())),
                    )
                    .set((
                        friendships::status.eq(FriendshipStatus::Accepted.as_str()),
                        friendships::updated_at.eq(Utc::now()),
                    ))
                    .returning(FriendshipRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;
                    if updated.is_some() {
                        diesel::insert_into(notifications::table)
                            .values(&notification_row)
                            .execute(conn)
                            .await?;
                    }
                    Ok(updated)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_write_error)?;
        accepted.map(to_friendship).transpose()
    }

    async fn delete(&self, id: &FriendshipId) -> Result<bool, FriendshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(friendships::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn list_friends(
        &self,
        user: &UserId,
    ) -> Result<Vec<Profile>, FriendshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = *user.as_uuid();
        let rows: Vec<ProfileRow> = profiles::table
            .inner_join(
                friendships::table.on(profiles::id
                    .eq(friendships::requester_id)
                    .and(friendships::addressee_id.eq(user))
                    .or(profiles::id
                        .eq(friendships::addressee_id)
                        .and(friendships::requester_id.eq(user)))),
            )
            .filter(friendships::status.eq(FriendshipStatus::Accepted.as_str()))
            .select(ProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut friends = rows
            .into_iter()
            .map(to_profile)
            .collect::<Result<Vec<_>, _>>()?;
        friends.sort_by_cached_key(|profile| profile.display_label().to_lowercase());
        Ok(friends)
    }

    async fn list_incoming(
        &self,
        user: &UserId,
    ) -> Result<Vec<FriendRequest>, FriendshipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(FriendshipRow, ProfileRow)> = friendships::table
            .inner_join(profiles::table.on(profiles::id.eq(friendships::requester_id)))
            .filter(friendships::addressee_id.eq(user.as_uuid()))
            .filter(friendships::status.eq(FriendshipStatus::Pending.as_str()))
            .order(friendships::created_at.desc())
            .select((FriendshipRow::as_select(), ProfileRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(friendship, requester)| {
                Ok(FriendRequest {
                    id: FriendshipId::from_uuid(friendship.id),
                    created_at: friendship.created_at,
                    requester: to_profile(requester)?,
                })
            })
            .collect()
    }
}
