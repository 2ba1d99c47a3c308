//! PostgreSQL-backed `AccountRepository` over the `profiles` table.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{AccountRepository, AccountRepositoryError, NewAccount, StoredCredentials};
use crate::domain::{
    EmailAddress, PasswordDigest, Profile, ProfileUpdate, SearchQuery, UserId, Username,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{InvalidRow, NewProfileRow, ProfileChangeset, ProfileRow};
use super::pool::{DbPool, PoolError};
use super::schema::profiles;

const EMAIL_UNIQUE_INDEX: &str = "profiles_email_key";

/// Diesel-backed implementation of the [`AccountRepository`] port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    map_basic_pool_error(error, |message| AccountRepositoryError::connection(message))
}

fn map_diesel_error(error: DieselError) -> AccountRepositoryError {
    map_basic_diesel_error(
        error,
        AccountRepositoryError::query,
        AccountRepositoryError::connection,
    )
}

fn map_invalid_row(error: InvalidRow) -> AccountRepositoryError {
    AccountRepositoryError::query(error.to_string())
}

fn to_profile(row: ProfileRow) -> Result<Profile, AccountRepositoryError> {
    Profile::try_from(row).map_err(map_invalid_row)
}

/// `ILIKE` pattern matching emails whose local part is exactly `username`.
fn local_part_pattern(username: &Username) -> String {
    let mut pattern = String::with_capacity(username.as_ref().len() + 2);
    for c in username.as_ref().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push_str("@%");
    pattern
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create(&self, account: &NewAccount) -> Result<Profile, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewProfileRow {
            id: *account.id.as_uuid(),
            email: account.email.as_ref(),
            password_hash: account.password_digest.as_str(),
            full_name: account.full_name.as_deref(),
        };

        let inserted = diesel::insert_into(profiles::table)
            .values(&row)
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err, Some(EMAIL_UNIQUE_INDEX)) {
                    AccountRepositoryError::duplicate_email(account.email.as_ref())
                } else {
                    map_diesel_error(err)
                }
            })?;
        to_profile(inserted)
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<(ProfileRow, String)> = profiles::table
            .filter(profiles::email.eq(email.as_ref()))
            .select((ProfileRow::as_select(), profiles::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        found
            .map(|(row, hash)| {
                Ok(StoredCredentials {
                    profile: to_profile(row)?,
                    password_digest: PasswordDigest::from_stored(hash),
                })
            })
            .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Profile>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        profiles::table
            .find(id.as_uuid())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_profile)
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Profile>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        profiles::table
            .filter(profiles::email.ilike(local_part_pattern(username)))
            .order(profiles::created_at.asc())
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_profile)
            .transpose()
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = ProfileChangeset {
            full_name: update.full_name.as_deref(),
            bio: update.bio.as_deref(),
            location: update.location.as_deref(),
            website: update.website.as_deref(),
            avatar_url: update.avatar_url.as_deref(),
            updated_at: Utc::now(),
        };
        let updated = diesel::update(profiles::table.find(id.as_uuid()))
            .set(&changeset)
            .returning(ProfileRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        debug!(user_id = %id, found = updated.is_some(), "profile update applied");
        updated.map(to_profile).transpose()
    }

    async fn search(
        &self,
        exclude: &UserId,
        query: &SearchQuery,
        limit: i64,
    ) -> Result<Vec<Profile>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = query.like_pattern();
        let rows: Vec<ProfileRow> = profiles::table
            .filter(profiles::id.ne(exclude.as_uuid()))
            .filter(
                profiles::full_name
                    .ilike(pattern.clone())
                    .or(profiles::email.ilike(pattern)),
            )
            .order((profiles::full_name.asc(), profiles::email.asc()))
            .limit(limit)
            .select(ProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_profile).collect()
    }
}
