//! Port for reader accounts and profiles.
//!
//! Accounts and profiles share one row: the profile columns plus the password
//! digest. Adapters never see plaintext passwords.

use async_trait::async_trait;

use crate::domain::{
    EmailAddress, PasswordDigest, Profile, ProfileUpdate, SearchQuery, UserId, Username,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } =>
            "an account already exists for {email}",
    }
}

/// Account to be created at sign up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub id: UserId,
    pub email: EmailAddress,
    pub full_name: Option<String>,
    pub password_digest: PasswordDigest,
}

/// Profile together with the stored password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub profile: Profile,
    pub password_digest: PasswordDigest,
}

/// Port for account persistence and profile lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account, failing with
    /// [`AccountRepositoryError::DuplicateEmail`] when the email is taken.
    async fn create(&self, account: &NewAccount) -> Result<Profile, AccountRepositoryError>;

    /// Look up the credentials stored for an email address.
    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, AccountRepositoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Profile>, AccountRepositoryError>;

    /// Find the profile whose email local part equals the username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Profile>, AccountRepositoryError>;

    /// Apply a settings update and refresh `updated_at`.
    ///
    /// Returns `None` when the profile does not exist.
    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<Profile>, AccountRepositoryError>;

    /// Case-insensitive search on full name or email, excluding `exclude`.
    async fn search(
        &self,
        exclude: &UserId,
        query: &SearchQuery,
        limit: i64,
    ) -> Result<Vec<Profile>, AccountRepositoryError>;
}
