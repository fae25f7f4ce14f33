//! Follow service
//!
//! Manages the follow graph. Gaining a follower grants the *followed* user
//! base XP and runs their follower milestone check.

use std::sync::Arc;

use crate::app::achievement_service::AchievementService;
use crate::app::xp_config::XP_FOLLOWER_GAINED;
use crate::domain::entities::{CounterKind, FollowEntry, UserFollow, UserId};
use crate::domain::ports::{AchievementRepository, FollowRepository, UserRepository};
use crate::error::{AppError, DomainError};

/// Service for the follow graph
pub struct FollowService<FR, UR, AR>
where
    FR: FollowRepository,
    UR: UserRepository,
    AR: AchievementRepository,
{
    follows: Arc<FR>,
    users: Arc<UR>,
    achievements: Arc<AchievementService<AR, UR>>,
}

impl<FR, UR, AR> FollowService<FR, UR, AR>
where
    FR: FollowRepository,
    UR: UserRepository,
    AR: AchievementRepository,
{
    pub fn new(
        follows: Arc<FR>,
        users: Arc<UR>,
        achievements: Arc<AchievementService<AR, UR>>,
    ) -> Self {
        Self {
            follows,
            users,
            achievements,
        }
    }

    /// Follow a user. The followed user gains base XP and their follower
    /// count is checked against the follower milestones.
    pub async fn follow(
        &self,
        follower_id: &UserId,
        target_id: &UserId,
    ) -> Result<UserFollow, AppError> {
        if follower_id == target_id {
            return Err(AppError::BadRequest(
                "You cannot follow yourself".to_string(),
            ));
        }
        if self.users.find_by_id(target_id).await?.is_none() {
            return Err(AppError::NotFound("User".to_string()));
        }
        if self
            .follows
            .find_edge(follower_id, target_id)
            .await?
            .is_some()
        {
            return Err(AppError::Domain(DomainError::AlreadyExists(
                "Already following this user".to_string(),
            )));
        }

        let edge = self.follows.create(follower_id, target_id).await?;

        self.users.adjust_xp(target_id, XP_FOLLOWER_GAINED).await?;
        let followers = self.follows.count_followers(target_id).await?;
        self.achievements
            .check_unlocks(target_id, CounterKind::Followers, followers as i32)
            .await?;

        tracing::info!(follower = %follower_id, followed = %target_id, "follow created");
        Ok(edge)
    }

    /// Unfollow a user. Takes back the base XP; unlocked achievements stay.
    pub async fn unfollow(
        &self,
        follower_id: &UserId,
        target_id: &UserId,
    ) -> Result<(), AppError> {
        if self
            .follows
            .find_edge(follower_id, target_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Follow".to_string()));
        }

        self.follows.delete(follower_id, target_id).await?;
        self.users.adjust_xp(target_id, -XP_FOLLOWER_GAINED).await?;

        tracing::info!(follower = %follower_id, followed = %target_id, "follow removed");
        Ok(())
    }

    /// Followers of a user, newest first
    pub async fn followers(&self, user_id: &UserId) -> Result<Vec<FollowEntry>, AppError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("User".to_string()));
        }
        Ok(self.follows.find_followers(user_id).await?)
    }

    /// Users a user follows, newest first
    pub async fn following(&self, user_id: &UserId) -> Result<Vec<FollowEntry>, AppError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("User".to_string()));
        }
        Ok(self.follows.find_following(user_id).await?)
    }
}
