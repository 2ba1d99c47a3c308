//! Driving port for sending and acknowledging recommendations.

use async_trait::async_trait;

use crate::domain::{
    BookId, Error, Locale, ReceivedRecommendation, Recommendation, RecommendationId, UserId,
};

/// Request to recommend a book to a friend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendBookRequest {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub book_id: BookId,
    pub message: Option<String>,
}

/// Domain use-case port for recommendation mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationCommand: Send + Sync {
    /// Recommend a book and notify the receiver in the sender's language.
    ///
    /// # Errors
    /// - forbidden when sender and receiver are not friends;
    /// - not found when the book is not in the local table;
    /// - invalid request for self recommendations or overlong messages.
    async fn recommend(
        &self,
        request: &RecommendBookRequest,
        locale: Locale,
    ) -> Result<Recommendation, Error>;

    /// Mark a received recommendation as read.
    async fn mark_read(&self, receiver: &UserId, id: &RecommendationId) -> Result<(), Error>;
}

/// Domain use-case port for recommendation reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationQuery: Send + Sync {
    /// Recommendations received by `receiver`, newest first.
    async fn received(&self, receiver: &UserId) -> Result<Vec<ReceivedRecommendation>, Error>;
}

/// Fixture command: readers have no friends, so nothing can be sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecommendationCommand;

#[async_trait]
impl RecommendationCommand for FixtureRecommendationCommand {
    async fn recommend(
        &self,
        _request: &RecommendBookRequest,
        _locale: Locale,
    ) -> Result<Recommendation, Error> {
        Err(Error::forbidden("you can only recommend books to friends"))
    }

    async fn mark_read(&self, _receiver: &UserId, _id: &RecommendationId) -> Result<(), Error> {
        Err(Error::not_found("recommendation not found"))
    }
}

/// Fixture query with an empty inbox.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecommendationQuery;

#[async_trait]
impl RecommendationQuery for FixtureRecommendationQuery {
    async fn received(&self, _receiver: &UserId) -> Result<Vec<ReceivedRecommendation>, Error> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_recommend_is_forbidden() {
        let request = RecommendBookRequest {
            sender_id: UserId::random(),
            receiver_id: UserId::random(),
            book_id: BookId::random(),
            message: None,
        };
        let err = FixtureRecommendationCommand
            .recommend(&request, Locale::Tr)
            .await
            .expect_err("no friends in fixtures");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
