//! Achievement domain entities
//!
//! Achievements are threshold milestones over per-user counters. Unlocks are
//! one-way: losing progress never revokes an achievement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Unique identifier for an achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AchievementId(pub Uuid);

impl AchievementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AchievementId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AchievementId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// A named milestone with a fixed XP reward
#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub xp_reward: i32,
    pub created_at: DateTime<Utc>,
}

/// Data needed to create an achievement (seeding)
#[derive(Debug, Clone)]
pub struct NewAchievement {
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub xp_reward: i32,
}

/// A user's unlock of an achievement, unique per (user, achievement)
#[derive(Debug, Clone, Serialize)]
pub struct UserAchievement {
    pub id: Uuid,
    pub user_id: UserId,
    pub achievement_id: AchievementId,
    pub unlocked_at: DateTime<Utc>,
}

/// An unlock joined with its achievement for listings
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedAchievement {
    pub achievement: Achievement,
    pub unlocked_at: DateTime<Utc>,
}

/// The counter an achievement family tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    VivacsCreated,
    ReviewsWritten,
    Followers,
}
