//! PostgreSQL adapter for UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::domain::entities::{NewUser, UpdateUser, User, UserExperience, UserId};
use crate::domain::ports::UserRepository;
use crate::entity::users;
use crate::error::DomainError;

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    db: DatabaseConnection,
}

impl PostgresUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn get_model(&self, id: &UserId) -> Result<users::Model, DomainError> {
        users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound(format!("User {}", id)))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find()
            .filter(users::Column::UserName.eq(user_name.trim()))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find()
            .filter(users::Column::GoogleId.eq(google_id))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_name: Set(user.user_name.trim().to_string()),
            email: Set(user.email.trim().to_lowercase()),
            google_id: Set(user.google_id.clone()),
            password_hash: Set(user.password_hash.clone()),
            avatar_url: Set(None),
            description: Set(None),
            user_experience: Set(UserExperience::Beginner.to_string()),
            xp_points: Set(0),
            vivacs_created: Set(0),
            reviews_written: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, id: &UserId, update: &UpdateUser) -> Result<User, DomainError> {
        let mut model = users::ActiveModel {
            id: Set(id.0),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        if let Some(ref name) = update.user_name {
            model.user_name = Set(name.trim().to_string());
        }
        if let Some(ref description) = update.description {
            model.description = Set(Some(description.clone()));
        }
        if let Some(experience) = update.user_experience {
            model.user_experience = Set(experience.to_string());
        }
        if let Some(ref avatar_url) = update.avatar_url {
            model.avatar_url = Set(Some(avatar_url.clone()));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn set_password_hash(&self, id: &UserId, hash: &str) -> Result<(), DomainError> {
        users::ActiveModel {
            id: Set(id.0),
            password_hash: Set(Some(hash.to_string())),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn set_google_id(&self, id: &UserId, google_id: &str) -> Result<(), DomainError> {
        users::ActiveModel {
            id: Set(id.0),
            google_id: Set(Some(google_id.to_string())),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        users::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn adjust_vivac_count(
        &self,
        id: &UserId,
        count_delta: i32,
        xp_delta: i32,
    ) -> Result<i32, DomainError> {
        let current = self.get_model(id).await?;
        let new_count = (current.vivacs_created + count_delta).max(0);
        let new_xp = (current.xp_points + xp_delta).max(0);

        users::ActiveModel {
            id: Set(id.0),
            vivacs_created: Set(new_count),
            xp_points: Set(new_xp),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(new_count)
    }

    async fn adjust_review_count(
        &self,
        id: &UserId,
        count_delta: i32,
        xp_delta: i32,
    ) -> Result<i32, DomainError> {
        let current = self.get_model(id).await?;
        let new_count = (current.reviews_written + count_delta).max(0);
        let new_xp = (current.xp_points + xp_delta).max(0);

        users::ActiveModel {
            id: Set(id.0),
            reviews_written: Set(new_count),
            xp_points: Set(new_xp),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(new_count)
    }

    async fn adjust_xp(&self, id: &UserId, delta: i32) -> Result<(), DomainError> {
        let current = self.get_model(id).await?;
        let new_xp = (current.xp_points + delta).max(0);

        users::ActiveModel {
            id: Set(id.0),
            xp_points: Set(new_xp),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn count_with_more_xp(&self, xp: i32) -> Result<i64, DomainError> {
        let count = users::Entity::find()
            .filter(users::Column::XpPoints.gt(xp))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count as i64)
    }

    async fn find_top_by_xp(&self, limit: u64) -> Result<Vec<User>, DomainError> {
        let results = users::Entity::find()
            .order_by_desc(users::Column::XpPoints)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: UserId(model.id),
            user_name: model.user_name,
            email: model.email,
            google_id: model.google_id,
            password_hash: model.password_hash,
            avatar_url: model.avatar_url,
            description: model.description,
            user_experience: model
                .user_experience
                .parse()
                .unwrap_or(UserExperience::Beginner),
            xp_points: model.xp_points,
            vivacs_created: model.vivacs_created,
            reviews_written: model.reviews_written,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
