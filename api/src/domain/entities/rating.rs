//! Rating domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{UserId, VivacId};

/// Unique identifier for a rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RatingId(pub Uuid);

impl RatingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RatingId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RatingId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RatingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 1-5 star review of a vivac point, one per (user, vivac)
#[derive(Debug, Clone, Serialize)]
pub struct Rating {
    pub id: RatingId,
    pub rating: i32,
    pub comment: Option<String>,
    pub user_id: UserId,
    pub vivac_point_id: VivacId,
    pub created_at: DateTime<Utc>,
}

/// Data needed to create a rating
#[derive(Debug, Clone)]
pub struct NewRating {
    pub rating: i32,
    pub comment: Option<String>,
    pub user_id: UserId,
    pub vivac_point_id: VivacId,
}

/// Valid star range
pub fn validate_stars(stars: i32) -> Result<(), String> {
    if (1..=5).contains(&stars) {
        Ok(())
    } else {
        Err(format!("Rating must be between 1 and 5, got {}", stars))
    }
}
