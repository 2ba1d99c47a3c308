//! Driving port for profile reads and reader search.

use async_trait::async_trait;

use crate::domain::{
    Error, Locale, Profile, ProfileSummary, PublicProfile, SessionProfile, UserId, Username,
};

use super::fixture_data::fixture_profile;

/// Domain use-case port for reading profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Profile of the given reader.
    async fn profile(&self, user_id: &UserId) -> Result<Profile, Error>;

    /// Profile of the signed-in reader with admin flag and session language.
    async fn session_profile(
        &self,
        user_id: &UserId,
        language: Locale,
    ) -> Result<SessionProfile, Error>;

    /// Public profile page looked up by username.
    async fn public_profile(&self, username: &Username) -> Result<PublicProfile, Error>;

    /// Sidebar summary for the signed-in reader.
    async fn summary(&self, user_id: &UserId) -> Result<ProfileSummary, Error>;

    /// Other readers matching `query`; short queries yield an empty list.
    async fn search_users(&self, user_id: &UserId, query: &str) -> Result<Vec<Profile>, Error>;
}

/// Fixture profile query used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileQuery;

#[async_trait]
impl ProfileQuery for FixtureProfileQuery {
    async fn profile(&self, user_id: &UserId) -> Result<Profile, Error> {
        fixture_profile(Some(user_id))
    }

    async fn session_profile(
        &self,
        user_id: &UserId,
        language: Locale,
    ) -> Result<SessionProfile, Error> {
        Ok(SessionProfile {
            profile: fixture_profile(Some(user_id))?,
            is_admin: false,
            language,
        })
    }

    async fn public_profile(&self, username: &Username) -> Result<PublicProfile, Error> {
        let profile = fixture_profile(None)?;
        if profile.username() != username.as_ref() {
            return Err(Error::not_found("profile not found"));
        }
        Ok(PublicProfile::from_library(profile, Vec::new()))
    }

    async fn summary(&self, user_id: &UserId) -> Result<ProfileSummary, Error> {
        Ok(ProfileSummary::from_library(
            fixture_profile(Some(user_id))?,
            Vec::new(),
        ))
    }

    async fn search_users(&self, _user_id: &UserId, _query: &str) -> Result<Vec<Profile>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_profile_uses_requested_id() {
        let user_id = UserId::random();
        let profile = FixtureProfileQuery
            .profile(&user_id)
            .await
            .expect("fixture profile");
        assert_eq!(profile.id, user_id);
        assert_eq!(profile.display_label(), "Ada Lovelace");
    }

    #[tokio::test]
    async fn fixture_public_profile_matches_username() {
        let query = FixtureProfileQuery;
        let found = query
            .public_profile(&Username::new("ada").expect("username"))
            .await
            .expect("fixture profile");
        assert_eq!(found.counts.total, 0);

        let err = query
            .public_profile(&Username::new("grace").expect("username"))
            .await
            .expect_err("unknown username");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
