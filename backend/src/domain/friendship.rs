//! Friendship rows and the relationship view derived from them.
//!
//! A friendship is stored once per unordered pair of readers. The row keeps
//! the direction of the original request so the two parties see
//! `pending_sent` and `pending_received` respectively.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Profile, UserId};

/// Identifier of a friendship row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FriendshipId(Uuid);

impl FriendshipId {
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

impl fmt::Display for FriendshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored friendship state. `Blocked` has no transition into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Blocked,
}

impl FriendshipStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Blocked => "blocked",
        }
    }

    /// Parse a stored status value.
    pub fn from_stored(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }
}

/// Directed friendship row between a requester and an addressee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    pub id: FriendshipId,
    pub requester_id: UserId,
    pub addressee_id: UserId,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// True when `user` is either party.
    pub fn involves(&self, user: &UserId) -> bool {
        &self.requester_id == user || &self.addressee_id == user
    }

    /// The party that is not `user`, if `user` is a party at all.
    pub fn other_party(&self, user: &UserId) -> Option<&UserId> {
        if &self.requester_id == user {
            Some(&self.addressee_id)
        } else if &self.addressee_id == user {
            Some(&self.requester_id)
        } else {
            None
        }
    }
}

/// Relationship between the viewer and another reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipView {
    None,
    PendingSent,
    PendingReceived,
    Friends,
    Blocked,
}

impl RelationshipView {
    /// Derive the view for `viewer` from the row linking the pair, if any.
    ///
    /// # Examples
    /// ```
    /// use shelfmate::domain::{RelationshipView, UserId};
    ///
    /// let viewer = UserId::random();
    /// assert_eq!(RelationshipView::derive(&viewer, None), RelationshipView::None);
    /// ```
    pub fn derive(viewer: &UserId, row: Option<&Friendship>) -> Self {
        let Some(row) = row else {
            return Self::None;
        };
        match row.status {
            FriendshipStatus::Accepted => Self::Friends,
            FriendshipStatus::Blocked => Self::Blocked,
            FriendshipStatus::Pending if &row.requester_id == viewer => Self::PendingSent,
            FriendshipStatus::Pending => Self::PendingReceived,
        }
    }
}

/// Relationship view plus the row id the client acts upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipStatus {
    pub status: RelationshipView,
    pub friendship_id: Option<FriendshipId>,
}

impl RelationshipStatus {
    pub fn derive(viewer: &UserId, row: Option<&Friendship>) -> Self {
        Self {
            status: RelationshipView::derive(viewer, row),
            friendship_id: row.map(|friendship| friendship.id),
        }
    }
}

/// Pending request received by the viewer, with the requester's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub id: FriendshipId,
    pub created_at: DateTime<Utc>,
    pub requester: Profile,
}
