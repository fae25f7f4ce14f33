//! PostgreSQL adapter for RatingRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{NewRating, Rating, RatingId, UserId, VivacId};
use crate::domain::ports::RatingRepository;
use crate::entity::ratings;
use crate::error::DomainError;

/// PostgreSQL implementation of RatingRepository
pub struct PostgresRatingRepository {
    db: DatabaseConnection,
}

impl PostgresRatingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RatingRepository for PostgresRatingRepository {
    async fn find_by_id(&self, id: &RatingId) -> Result<Option<Rating>, DomainError> {
        let result = ratings::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_user_and_vivac(
        &self,
        user_id: &UserId,
        vivac_id: &VivacId,
    ) -> Result<Option<Rating>, DomainError> {
        let result = ratings::Entity::find()
            .filter(ratings::Column::UserId.eq(user_id.0))
            .filter(ratings::Column::VivacPointId.eq(vivac_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_vivac(&self, vivac_id: &VivacId) -> Result<Vec<Rating>, DomainError> {
        let results = ratings::Entity::find()
            .filter(ratings::Column::VivacPointId.eq(vivac_id.0))
            .order_by_desc(ratings::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Rating>, DomainError> {
        let results = ratings::Entity::find()
            .filter(ratings::Column::UserId.eq(user_id.0))
            .order_by_desc(ratings::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, rating: &NewRating) -> Result<Rating, DomainError> {
        let model = ratings::ActiveModel {
            id: Set(Uuid::new_v4()),
            rating: Set(rating.rating),
            comment: Set(rating.comment.clone()),
            user_id: Set(rating.user_id.0),
            vivac_point_id: Set(rating.vivac_point_id.0),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(
        &self,
        id: &RatingId,
        stars: Option<i32>,
        comment: Option<String>,
    ) -> Result<Rating, DomainError> {
        let mut model = ratings::ActiveModel {
            id: Set(id.0),
            ..Default::default()
        };

        if let Some(stars) = stars {
            model.rating = Set(stars);
        }
        if let Some(comment) = comment {
            model.comment = Set(Some(comment));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &RatingId) -> Result<(), DomainError> {
        ratings::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<ratings::Model> for Rating {
    fn from(model: ratings::Model) -> Self {
        Rating {
            id: RatingId(model.id),
            rating: model.rating,
            comment: model.comment,
            user_id: UserId(model.user_id),
            vivac_point_id: VivacId(model.vivac_point_id),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
