//! Port for book recommendations.

use async_trait::async_trait;

use crate::domain::{
    NewNotification, NewRecommendation, ReceivedRecommendation, Recommendation, RecommendationId,
    UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recommendation repository adapters.
    pub enum RecommendationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "recommendation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "recommendation repository query failed: {message}",
    }
}

/// Port for recommendation persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationRepository: Send + Sync {
    /// Upsert on (sender, receiver, book), clearing the read flag, and insert
    /// the notification in the same transaction.
    async fn upsert_with_notification(
        &self,
        recommendation: &NewRecommendation,
        notification: &NewNotification,
    ) -> Result<Recommendation, RecommendationRepositoryError>;

    /// Recommendations received by `receiver`, newest first.
    async fn list_received(
        &self,
        receiver: &UserId,
    ) -> Result<Vec<ReceivedRecommendation>, RecommendationRepositoryError>;

    /// Flag a recommendation as read when `receiver` owns it.
    ///
    /// Returns `false` when no matching row exists.
    async fn mark_read(
        &self,
        id: &RecommendationId,
        receiver: &UserId,
    ) -> Result<bool, RecommendationRepositoryError>;
}
