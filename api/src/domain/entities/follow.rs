//! Follow-graph domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Unique identifier for a follow edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FollowId(pub Uuid);

impl FollowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FollowId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for FollowId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// A directed follow edge between two users
#[derive(Debug, Clone, Serialize)]
pub struct UserFollow {
    pub id: FollowId,
    pub follower_id: UserId,
    pub followed_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Minimal profile embedded in follower/following listings
#[derive(Debug, Clone, Serialize)]
pub struct FollowProfile {
    pub id: UserId,
    pub user_name: String,
    pub avatar_url: Option<String>,
}

/// One entry in a follower or following listing
#[derive(Debug, Clone, Serialize)]
pub struct FollowEntry {
    pub id: FollowId,
    pub created_at: DateTime<Utc>,
    pub user: FollowProfile,
}
