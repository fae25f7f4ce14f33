//! PostgreSQL adapter for AchievementRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{
    Achievement, AchievementId, NewAchievement, UnlockedAchievement, UserAchievement, UserId,
};
use crate::domain::ports::AchievementRepository;
use crate::entity::{achievements, user_achievements};
use crate::error::DomainError;

/// PostgreSQL implementation of AchievementRepository
pub struct PostgresAchievementRepository {
    db: DatabaseConnection,
}

impl PostgresAchievementRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AchievementRepository for PostgresAchievementRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Achievement>, DomainError> {
        let result = achievements::Entity::find()
            .filter(achievements::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_all(&self) -> Result<Vec<Achievement>, DomainError> {
        let results = achievements::Entity::find()
            .order_by_asc(achievements::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, achievement: &NewAchievement) -> Result<Achievement, DomainError> {
        let model = achievements::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(achievement.name.clone()),
            description: Set(achievement.description.clone()),
            icon_url: Set(achievement.icon_url.clone()),
            xp_reward: Set(achievement.xp_reward),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn is_unlocked(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<bool, DomainError> {
        let result = user_achievements::Entity::find()
            .filter(user_achievements::Column::UserId.eq(user_id.0))
            .filter(user_achievements::Column::AchievementId.eq(achievement_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.is_some())
    }

    async fn unlock(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<UserAchievement, DomainError> {
        // The (user, achievement) unique constraint makes concurrent
        // unlocks race; re-read on conflict instead of failing.
        if let Some(existing) = user_achievements::Entity::find()
            .filter(user_achievements::Column::UserId.eq(user_id.0))
            .filter(user_achievements::Column::AchievementId.eq(achievement_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
        {
            return Ok(existing.into());
        }

        let model = user_achievements::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id.0),
            achievement_id: Set(achievement_id.0),
            unlocked_at: Set(Utc::now().fixed_offset()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn find_unlocked(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UnlockedAchievement>, DomainError> {
        let unlocks = user_achievements::Entity::find()
            .filter(user_achievements::Column::UserId.eq(user_id.0))
            .order_by_asc(user_achievements::Column::UnlockedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let ids: Vec<Uuid> = unlocks.iter().map(|u| u.achievement_id).collect();

        let catalog: HashMap<Uuid, Achievement> = achievements::Entity::find()
            .filter(achievements::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .into_iter()
            .map(|m| (m.id, m.into()))
            .collect();

        Ok(unlocks
            .into_iter()
            .filter_map(|u| {
                let achievement = catalog.get(&u.achievement_id)?.clone();
                Some(UnlockedAchievement {
                    achievement,
                    unlocked_at: u.unlocked_at.with_timezone(&Utc),
                })
            })
            .collect())
    }
}

/// Convert SeaORM models to domain entities
impl From<achievements::Model> for Achievement {
    fn from(model: achievements::Model) -> Self {
        Achievement {
            id: AchievementId(model.id),
            name: model.name,
            description: model.description,
            icon_url: model.icon_url,
            xp_reward: model.xp_reward,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<user_achievements::Model> for UserAchievement {
    fn from(model: user_achievements::Model) -> Self {
        UserAchievement {
            id: model.id,
            user_id: UserId(model.user_id),
            achievement_id: AchievementId(model.achievement_id),
            unlocked_at: model.unlocked_at.with_timezone(&Utc),
        }
    }
}
