//! PostgreSQL-backed `RecommendationRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{RecommendationRepository, RecommendationRepositoryError};
use crate::domain::{
    Book, NewNotification, NewRecommendation, Profile, ReceivedRecommendation, Recommendation,
    RecommendationId, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    BookRow, NewNotificationRow, NewRecommendationRow, ProfileRow, RecommendationRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{book_recommendations, books, notifications, profiles};

/// Diesel-backed implementation of the [`RecommendationRepository`] port.
#[derive(Clone)]
pub struct DieselRecommendationRepository {
    pool: DbPool,
}

impl DieselRecommendationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecommendationRepositoryError {
    map_basic_pool_error(error, |message| {
        RecommendationRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: DieselError) -> RecommendationRepositoryError {
    map_basic_diesel_error(
        error,
        RecommendationRepositoryError::query,
        RecommendationRepositoryError::connection,
    )
}

#[async_trait]
impl RecommendationRepository for DieselRecommendationRepository {
    async fn upsert_with_notification(
        &self,
        recommendation: &NewRecommendation,
        notification: &NewNotification,
    ) -> Result<Recommendation, RecommendationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewRecommendationRow {
            id: Uuid::new_v4(),
            sender_id: *recommendation.sender_id.as_uuid(),
            receiver_id: *recommendation.receiver_id.as_uuid(),
            book_id: *recommendation.book_id.as_uuid(),
            message: recommendation.message.as_deref(),
            is_read: false,
        };
        let notification_row = NewNotificationRow::from_domain(notification);

        let stored = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    // Re-recommending refreshes the message and resurfaces it as unread.
                    let stored = diesel::insert_into(book_recommendations::table)
                        .values(&row)
                        .on_conflict((
                            book_recommendations::sender_id,
                            book_recommendations::receiver_id,
                            book_recommendations::book_id,
                        ))
                        .do_update()
                        .set((
                            book_recommendations::message
                                .eq(excluded(book_recommendations::message)),
                            book_recommendations::is_read.eq(false),
                        ))
                        .returning(RecommendationRow::as_returning())
                        .get_result(conn)
                        .await?;
                    diesel::insert_into(notifications::table)
                        .values(&notification_row)
                        .execute(conn)
                        .await?;
                    Ok(stored)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        debug!(recommendation_id = %stored.id, "recommendation stored with notification");
        Ok(Recommendation::from(stored))
    }

    async fn list_received(
        &self,
        receiver: &UserId,
    ) -> Result<Vec<ReceivedRecommendation>, RecommendationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(RecommendationRow, BookRow, ProfileRow)> = book_recommendations::table
            .inner_join(books::table)
            .inner_join(profiles::table.on(profiles::id.eq(book_recommendations::sender_id)))
            .filter(book_recommendations::receiver_id.eq(receiver.as_uuid()))
            .order(book_recommendations::created_at.desc())
            .select((
                RecommendationRow::as_select(),
                BookRow::as_select(),
                ProfileRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(recommendation, book, sender)| {
                let sender = Profile::try_from(sender)
                    .map_err(|err| RecommendationRepositoryError::query(err.to_string()))?;
                Ok(ReceivedRecommendation {
                    recommendation: Recommendation::from(recommendation),
                    sender,
                    book: Book::from(book),
                })
            })
            .collect()
    }

    async fn mark_read(
        &self,
        id: &RecommendationId,
        receiver: &UserId,
    ) -> Result<bool, RecommendationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            book_recommendations::table
                .find(id.as_uuid())
                .filter(book_recommendations::receiver_id.eq(receiver.as_uuid())),
        )
        .set(book_recommendations::is_read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn checkout_failures_are_connection_errors() {
        let err = map_pool_error(PoolError::checkout("pool exhausted"));
        assert!(matches!(
            err,
            RecommendationRepositoryError::Connection { ref message } if message == "pool exhausted"
        ));
    }
}
