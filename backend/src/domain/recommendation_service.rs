//! Book recommendations between friends.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    AccountRepository, BookRepository, FriendshipRepository, RecommendBookRequest,
    RecommendationCommand, RecommendationQuery, RecommendationRepository,
};
use crate::domain::service_errors::{
    map_account_error, map_book_error, map_friendship_error, map_recommendation_error,
};
use crate::domain::{
    Error, FriendshipStatus, Locale, NewNotification, NewRecommendation, ReceivedRecommendation,
    Recommendation, RecommendationId, RecommendationValidationError, Translator, UserId,
};

/// Recommendation service implementing [`RecommendationCommand`] and
/// [`RecommendationQuery`].
#[derive(Clone)]
pub struct RecommendationService<R, F, A, B> {
    recommendations: Arc<R>,
    friendships: Arc<F>,
    accounts: Arc<A>,
    books: Arc<B>,
}

impl<R, F, A, B> RecommendationService<R, F, A, B> {
    pub fn new(
        recommendations: Arc<R>,
        friendships: Arc<F>,
        accounts: Arc<A>,
        books: Arc<B>,
    ) -> Self {
        Self {
            recommendations,
            friendships,
            accounts,
            books,
        }
    }
}

fn map_validation_error(error: RecommendationValidationError) -> Error {
    let field = match error {
        RecommendationValidationError::MessageTooLong => "message",
        RecommendationValidationError::SelfRecommendation => "receiverId",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

#[async_trait]
impl<R, F, A, B> RecommendationCommand for RecommendationService<R, F, A, B>
where
    R: RecommendationRepository,
    F: FriendshipRepository,
    A: AccountRepository,
    B: BookRepository,
{
    async fn recommend(
        &self,
        request: &RecommendBookRequest,
        locale: Locale,
    ) -> Result<Recommendation, Error> {
        let recommendation = NewRecommendation::try_new(
            request.sender_id.clone(),
            request.receiver_id.clone(),
            request.book_id,
            request.message.clone(),
        )
        .map_err(map_validation_error)?;

        let are_friends = self
            .friendships
            .find_between(&recommendation.sender_id, &recommendation.receiver_id)
            .await
            .map_err(map_friendship_error)?
            .is_some_and(|row| row.status == FriendshipStatus::Accepted);
        if !are_friends {
            return Err(Error::forbidden("you can only recommend books to friends"));
        }

        let book = self
            .books
            .find_by_id(&recommendation.book_id)
            .await
            .map_err(map_book_error)?
            .ok_or_else(|| Error::not_found("book not found"))?;
        let sender = self
            .accounts
            .find_by_id(&recommendation.sender_id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))?;

        let notification = NewNotification::book_recommendation(
            &Translator::new(locale),
            &sender,
            &recommendation.receiver_id,
            &book,
        );
        let stored = self
            .recommendations
            .upsert_with_notification(&recommendation, &notification)
            .await
            .map_err(map_recommendation_error)?;
        info!(recommendation_id = %stored.id, book_id = %stored.book_id, "book recommended");
        Ok(stored)
    }

    async fn mark_read(&self, receiver: &UserId, id: &RecommendationId) -> Result<(), Error> {
        let updated = self
            .recommendations
            .mark_read(id, receiver)
            .await
            .map_err(map_recommendation_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found("recommendation not found"))
        }
    }
}

#[async_trait]
impl<R, F, A, B> RecommendationQuery for RecommendationService<R, F, A, B>
where
    R: RecommendationRepository,
    F: FriendshipRepository,
    A: AccountRepository,
    B: BookRepository,
{
    async fn received(&self, receiver: &UserId) -> Result<Vec<ReceivedRecommendation>, Error> {
        self.recommendations
            .list_received(receiver)
            .await
            .map_err(map_recommendation_error)
    }
}

#[cfg(test)]
#[path = "recommendation_service_tests.rs"]
mod tests;
