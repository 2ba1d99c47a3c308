//! Account and profile domain service.
//!
//! Implements [`AccountCommand`] and [`ProfileQuery`]. Password hashing and
//! verification run on the blocking pool because Argon2 is deliberately
//! CPU-expensive.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, AccountRepository, LibraryRepository, NewAccount, ProfileQuery,
};
use crate::domain::service_errors::{map_account_error, map_library_error};
use crate::domain::{
    AdminPolicy, Error, Locale, LoginCredentials, PasswordDigest, Profile, ProfileSummary,
    ProfileUpdate, PublicProfile, Registration, SearchQuery, SessionProfile, USER_SEARCH_LIMIT,
    UserId, Username,
};

/// Account service implementing the account and profile driving ports.
#[derive(Clone)]
pub struct AccountService<A, L> {
    accounts: Arc<A>,
    library: Arc<L>,
    admins: Arc<AdminPolicy>,
}

impl<A, L> AccountService<A, L> {
    /// Create a new service with the given repositories and admin policy.
    pub fn new(accounts: Arc<A>, library: Arc<L>, admins: Arc<AdminPolicy>) -> Self {
        Self {
            accounts,
            library,
            admins,
        }
    }
}

async fn hash_password(password: &str) -> Result<PasswordDigest, Error> {
    let password = Zeroizing::new(password.to_owned());
    tokio::task::spawn_blocking(move || PasswordDigest::hash(&password))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(|err| Error::internal(err.to_string()))
}

async fn verify_password(digest: PasswordDigest, password: &str) -> Result<bool, Error> {
    let password = Zeroizing::new(password.to_owned());
    tokio::task::spawn_blocking(move || digest.verify(&password))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

/// The session names a reader whose profile no longer exists.
fn session_expired() -> Error {
    Error::unauthorized("login required")
}

impl<A, L> AccountService<A, L>
where
    A: AccountRepository,
    L: LibraryRepository,
{
    /// Load the caller's own profile.
    async fn require_profile(&self, user_id: &UserId) -> Result<Profile, Error> {
        self.accounts
            .find_by_id(user_id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(session_expired)
    }
}

#[async_trait]
impl<A, L> AccountCommand for AccountService<A, L>
where
    A: AccountRepository,
    L: LibraryRepository,
{
    async fn sign_up(&self, registration: &Registration) -> Result<Profile, Error> {
        let credentials = registration.credentials();
        let password_digest = hash_password(credentials.password()).await?;
        let account = NewAccount {
            id: UserId::random(),
            email: credentials.email().clone(),
            full_name: registration.full_name().map(str::to_owned),
            password_digest,
        };
        let profile = self
            .accounts
            .create(&account)
            .await
            .map_err(map_account_error)?;
        info!(user_id = %profile.id, "account created");
        Ok(profile)
    }

    async fn log_in(&self, credentials: &LoginCredentials) -> Result<Profile, Error> {
        let Some(stored) = self
            .accounts
            .find_credentials(credentials.email())
            .await
            .map_err(map_account_error)?
        else {
            debug!("login attempt for unknown email");
            return Err(invalid_credentials());
        };

        if !verify_password(stored.password_digest, credentials.password()).await? {
            debug!(user_id = %stored.profile.id, "login attempt with wrong password");
            return Err(invalid_credentials());
        }
        Ok(stored.profile)
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, Error> {
        self.accounts
            .update_profile(user_id, update)
            .await
            .map_err(map_account_error)?
            .ok_or_else(session_expired)
    }
}

#[async_trait]
impl<A, L> ProfileQuery for AccountService<A, L>
where
    A: AccountRepository,
    L: LibraryRepository,
{
    async fn profile(&self, user_id: &UserId) -> Result<Profile, Error> {
        self.require_profile(user_id).await
    }

    async fn session_profile(
        &self,
        user_id: &UserId,
        language: Locale,
    ) -> Result<SessionProfile, Error> {
        let profile = self.require_profile(user_id).await?;
        let is_admin = self.admins.is_admin(&profile.email);
        Ok(SessionProfile {
            profile,
            is_admin,
            language,
        })
    }

    async fn public_profile(&self, username: &Username) -> Result<PublicProfile, Error> {
        let profile = self
            .accounts
            .find_by_username(username)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::not_found("profile not found"))?;
        let library = self
            .library
            .list(&profile.id, None)
            .await
            .map_err(map_library_error)?;
        Ok(PublicProfile::from_library(profile, library))
    }

    async fn summary(&self, user_id: &UserId) -> Result<ProfileSummary, Error> {
        let profile = self.require_profile(user_id).await?;
        let library = self
            .library
            .list(user_id, None)
            .await
            .map_err(map_library_error)?;
        Ok(ProfileSummary::from_library(profile, library))
    }

    async fn search_users(&self, user_id: &UserId, query: &str) -> Result<Vec<Profile>, Error> {
        let Some(query) = SearchQuery::parse(query) else {
            return Ok(Vec::new());
        };
        self.accounts
            .search(user_id, &query, USER_SEARCH_LIMIT)
            .await
            .map_err(map_account_error)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
