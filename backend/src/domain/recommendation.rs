//! Book recommendations sent between friends.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::bounded_text;
use super::{Book, BookId, Profile, UserId};

/// Maximum length of the optional message attached to a recommendation.
pub const RECOMMENDATION_MESSAGE_MAX: usize = 500;

/// Identifier of a recommendation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecommendationId(Uuid);

impl RecommendationId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecommendationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors for recommendation input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecommendationValidationError {
    #[error("message must be at most {RECOMMENDATION_MESSAGE_MAX} characters")]
    MessageTooLong,
    #[error("readers cannot recommend books to themselves")]
    SelfRecommendation,
}

/// Validated recommendation about to be upserted.
///
/// One row exists per (sender, receiver, book); sending again replaces the
/// message and marks the row unread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecommendation {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub book_id: BookId,
    pub message: Option<String>,
}

impl NewRecommendation {
    pub fn try_new(
        sender_id: UserId,
        receiver_id: UserId,
        book_id: BookId,
        message: Option<String>,
    ) -> Result<Self, RecommendationValidationError> {
        if sender_id == receiver_id {
            return Err(RecommendationValidationError::SelfRecommendation);
        }
        let message = bounded_text(message, "message", RECOMMENDATION_MESSAGE_MAX)
            .map_err(|_| RecommendationValidationError::MessageTooLong)?;
        Ok(Self {
            sender_id,
            receiver_id,
            book_id,
            message,
        })
    }
}

/// Stored recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: RecommendationId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub book_id: BookId,
    pub message: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Received recommendation with sender profile and book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedRecommendation {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub sender: Profile,
    pub book: Book,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejects_self_recommendation() {
        let user = UserId::random();
        let err = NewRecommendation::try_new(user.clone(), user, BookId::random(), None)
            .expect_err("self recommendation");
        assert_eq!(err, RecommendationValidationError::SelfRecommendation);
    }

    #[rstest]
    #[case(RECOMMENDATION_MESSAGE_MAX, true)]
    #[case(RECOMMENDATION_MESSAGE_MAX + 1, false)]
    fn message_length_is_capped(#[case] length: usize, #[case] ok: bool) {
        let result = NewRecommendation::try_new(
            UserId::random(),
            UserId::random(),
            BookId::random(),
            Some("ş".repeat(length)),
        );
        assert_eq!(result.is_ok(), ok);
    }

    #[rstest]
    fn blank_message_becomes_none() {
        let rec = NewRecommendation::try_new(
            UserId::random(),
            UserId::random(),
            BookId::random(),
            Some("  \n ".to_owned()),
        )
        .expect("valid recommendation");
        assert!(rec.message.is_none());
    }
}
