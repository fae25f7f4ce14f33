//! Achievement engine
//!
//! Seeds the achievement catalog and checks counter milestones after every
//! qualifying action. Unlocks are a one-way ratchet: once earned, an
//! achievement is never taken back, even if the counter later drops below
//! its threshold.

use std::sync::Arc;

use crate::app::xp_config::{
    follower_achievement_name, review_achievement_name, vivac_achievement_name,
    FOLLOWER_THRESHOLDS, PROFILE_COMPLETE_ACHIEVEMENT, REVIEW_THRESHOLDS, VIVAC_THRESHOLDS,
    XP_PROFILE_COMPLETE,
};
use crate::domain::entities::{
    Achievement, CounterKind, NewAchievement, UnlockedAchievement, UserId,
};
use crate::domain::ports::{AchievementRepository, UserRepository};
use crate::error::DomainError;

/// Service for the achievement catalog and unlock checks
pub struct AchievementService<AR, UR>
where
    AR: AchievementRepository,
    UR: UserRepository,
{
    achievements: Arc<AR>,
    users: Arc<UR>,
}

impl<AR, UR> AchievementService<AR, UR>
where
    AR: AchievementRepository,
    UR: UserRepository,
{
    pub fn new(achievements: Arc<AR>, users: Arc<UR>) -> Self {
        Self {
            achievements,
            users,
        }
    }

    /// Seed the catalog, skipping achievements that already exist.
    /// Safe to run on every startup.
    pub async fn seed(&self) -> Result<(), DomainError> {
        let mut catalog: Vec<(String, String, i32)> = Vec::new();

        for (threshold, xp) in VIVAC_THRESHOLDS {
            let description = if threshold == 1 {
                "Has creado tu primer punto de vivac.".to_string()
            } else {
                format!("Has creado {} puntos de vivac.", threshold)
            };
            catalog.push((vivac_achievement_name(threshold), description, xp));
        }

        for (threshold, xp) in REVIEW_THRESHOLDS {
            let description = if threshold == 1 {
                "Has escrito tu primera reseña.".to_string()
            } else {
                format!("Has escrito {} reseñas.", threshold)
            };
            catalog.push((review_achievement_name(threshold), description, xp));
        }

        catalog.push((
            PROFILE_COMPLETE_ACHIEVEMENT.to_string(),
            "Completaste todos los detalles de tu perfil.".to_string(),
            XP_PROFILE_COMPLETE,
        ));

        for (threshold, xp) in FOLLOWER_THRESHOLDS {
            let description = if threshold == 1 {
                "Has conseguido tu primer seguidor.".to_string()
            } else {
                format!("Has alcanzado {} seguidores.", threshold)
            };
            catalog.push((follower_achievement_name(threshold), description, xp));
        }

        let mut created = 0;
        for (name, description, xp_reward) in catalog {
            if self.achievements.find_by_name(&name).await?.is_none() {
                self.achievements
                    .create(&NewAchievement {
                        name,
                        description: Some(description),
                        icon_url: None,
                        xp_reward,
                    })
                    .await?;
                created += 1;
            }
        }

        if created > 0 {
            tracing::info!(created, "achievement catalog seeded");
        }
        Ok(())
    }

    /// Check every milestone of `kind` against the new counter value and
    /// unlock what the user has earned. Returns the newly unlocked
    /// achievements, oldest threshold first.
    pub async fn check_unlocks(
        &self,
        user_id: &UserId,
        kind: CounterKind,
        counter: i32,
    ) -> Result<Vec<Achievement>, DomainError> {
        let thresholds: &[(i32, i32)] = match kind {
            CounterKind::VivacsCreated => &VIVAC_THRESHOLDS,
            CounterKind::ReviewsWritten => &REVIEW_THRESHOLDS,
            CounterKind::Followers => &FOLLOWER_THRESHOLDS,
        };

        let mut unlocked = Vec::new();
        for &(threshold, _) in thresholds {
            if counter < threshold {
                break;
            }

            let name = match kind {
                CounterKind::VivacsCreated => vivac_achievement_name(threshold),
                CounterKind::ReviewsWritten => review_achievement_name(threshold),
                CounterKind::Followers => follower_achievement_name(threshold),
            };

            if let Some(achievement) = self.unlock_by_name(user_id, &name).await? {
                unlocked.push(achievement);
            }
        }

        Ok(unlocked)
    }

    /// Unlock the named achievement for the user if not already unlocked.
    /// Grants the achievement's XP reward on a fresh unlock.
    pub async fn unlock_by_name(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<Option<Achievement>, DomainError> {
        let achievement = match self.achievements.find_by_name(name).await? {
            Some(a) => a,
            None => {
                tracing::warn!(name, "achievement missing from catalog");
                return Ok(None);
            }
        };

        if self.achievements.is_unlocked(user_id, &achievement.id).await? {
            return Ok(None);
        }

        self.achievements.unlock(user_id, &achievement.id).await?;
        self.users.adjust_xp(user_id, achievement.xp_reward).await?;

        tracing::info!(user = %user_id, achievement = %achievement.name, "achievement unlocked");
        Ok(Some(achievement))
    }

    /// The full achievement catalog
    pub async fn catalog(&self) -> Result<Vec<Achievement>, DomainError> {
        self.achievements.find_all().await
    }

    /// A user's unlocked achievements, oldest first
    pub async fn unlocked(&self, user_id: &UserId) -> Result<Vec<UnlockedAchievement>, DomainError> {
        self.achievements.find_unlocked(user_id).await
    }
}
