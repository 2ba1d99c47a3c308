//! Driving port for account lifecycle operations.
//!
//! Inbound adapters call this port for sign up, sign in and settings updates
//! without knowing how passwords are hashed or where profiles live.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Profile, ProfileUpdate, Registration, UserId};

use super::fixture_data::{FIXTURE_EMAIL, FIXTURE_PASSWORD, fixture_profile};

/// Domain use-case port for account mutations and authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and return its profile.
    ///
    /// # Errors
    /// Returns a conflict error when the email is already registered.
    async fn sign_up(&self, registration: &Registration) -> Result<Profile, Error>;

    /// Verify credentials and return the reader's profile.
    ///
    /// # Errors
    /// Returns an unauthorised error for unknown emails and wrong passwords
    /// alike.
    async fn log_in(&self, credentials: &LoginCredentials) -> Result<Profile, Error>;

    /// Apply a settings-form update to the reader's profile.
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, Error>;
}

/// In-memory account command used when no database is configured.
///
/// `ada@example.org` / `password` signs in; signing up with that email
/// conflicts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountCommand;

#[async_trait]
impl AccountCommand for FixtureAccountCommand {
    async fn sign_up(&self, registration: &Registration) -> Result<Profile, Error> {
        let email = registration.credentials().email();
        if email.as_ref() == FIXTURE_EMAIL {
            return Err(Error::conflict("an account already exists for this email"));
        }
        let mut profile = Profile::new(UserId::random(), email.clone(), chrono::Utc::now());
        profile.full_name = registration.full_name().map(str::to_owned);
        Ok(profile)
    }

    async fn log_in(&self, credentials: &LoginCredentials) -> Result<Profile, Error> {
        if credentials.email().as_ref() == FIXTURE_EMAIL
            && credentials.password() == FIXTURE_PASSWORD
        {
            fixture_profile(None)
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, Error> {
        let mut profile = fixture_profile(Some(user_id))?;
        profile.full_name = update.full_name.clone();
        profile.bio = update.bio.clone();
        profile.location = update.location.clone();
        profile.website = update.website.clone();
        profile.avatar_url = update.avatar_url.clone();
        profile.updated_at = chrono::Utc::now();
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(FIXTURE_EMAIL, FIXTURE_PASSWORD, true)]
    #[case(FIXTURE_EMAIL, "wrong", false)]
    #[case("other@example.org", FIXTURE_PASSWORD, false)]
    #[tokio::test]
    async fn fixture_log_in_accepts_only_fixture_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let creds = LoginCredentials::try_from_parts(email, password).expect("credentials shape");
        match (should_succeed, FixtureAccountCommand.log_in(&creds).await) {
            (true, Ok(profile)) => assert_eq!(profile.email.as_ref(), FIXTURE_EMAIL),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (expected, outcome) => panic!("expected success={expected}, got {outcome:?}"),
        }
    }

    #[tokio::test]
    async fn fixture_sign_up_conflicts_on_fixture_email() {
        let registration =
            Registration::try_from_parts(FIXTURE_EMAIL, "longenough", None).expect("valid");
        let err = FixtureAccountCommand
            .sign_up(&registration)
            .await
            .expect_err("duplicate email");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }
}
