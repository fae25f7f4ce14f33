//! PostgreSQL adapter for VivacRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{
    AccessDifficulty, NewVivac, UpdateVivac, UserId, VivacFilter, VivacId, VivacPoint,
};
use crate::domain::ports::VivacRepository;
use crate::entity::vivac_points;
use crate::error::DomainError;

/// PostgreSQL implementation of VivacRepository
pub struct PostgresVivacRepository {
    db: DatabaseConnection,
}

impl PostgresVivacRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VivacRepository for PostgresVivacRepository {
    async fn find_by_id(&self, id: &VivacId) -> Result<Option<VivacPoint>, DomainError> {
        let result = vivac_points::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_filtered(&self, filter: &VivacFilter) -> Result<Vec<VivacPoint>, DomainError> {
        let mut query = vivac_points::Entity::find();

        if let Some(privacity) = filter.privacity {
            query = query.filter(vivac_points::Column::Privacity.eq(privacity.to_string()));
        }
        if let Some(difficulty) = filter.access_difficulty {
            query =
                query.filter(vivac_points::Column::AccessDifficulty.eq(difficulty.to_string()));
        }
        if let Some(min) = filter.min_elevation {
            query = query.filter(vivac_points::Column::Elevation.gte(min));
        }
        if let Some(max) = filter.max_elevation {
            query = query.filter(vivac_points::Column::Elevation.lte(max));
        }
        if let Some(ref geo) = filter.geo {
            let bbox = geo.bounding_box();
            query = query
                .filter(vivac_points::Column::Latitude.gte(bbox.min_lat))
                .filter(vivac_points::Column::Latitude.lte(bbox.max_lat))
                .filter(vivac_points::Column::Longitude.gte(bbox.min_lon))
                .filter(vivac_points::Column::Longitude.lte(bbox.max_lon));
        }

        let results = query
            .order_by_desc(vivac_points::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn find_by_creator(&self, user_id: &UserId) -> Result<Vec<VivacPoint>, DomainError> {
        let results = vivac_points::Entity::find()
            .filter(vivac_points::Column::CreatedBy.eq(user_id.0))
            .order_by_desc(vivac_points::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn count_by_creator(&self, user_id: &UserId) -> Result<i64, DomainError> {
        let count = vivac_points::Entity::find()
            .filter(vivac_points::Column::CreatedBy.eq(user_id.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count as i64)
    }

    async fn create(&self, vivac: &NewVivac) -> Result<VivacPoint, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = vivac_points::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(vivac.name.trim().to_string()),
            description: Set(vivac.description.clone()),
            latitude: Set(vivac.latitude),
            longitude: Set(vivac.longitude),
            elevation: Set(vivac.elevation),
            access_difficulty: Set(vivac.access_difficulty.to_string()),
            environment: Set(vivac.environment.map(|e| e.to_string())),
            privacity: Set(vivac.privacity.map(|p| p.to_string())),
            terrain_type: Set(vivac.terrain_type.map(|t| t.to_string())),
            photo_urls: Set(serde_json::json!(vivac.photo_urls)),
            pet_friendly: Set(vivac.pet_friendly),
            avg_rating: Set(None),
            review_count: Set(0),
            created_by: Set(vivac.created_by.0),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, id: &VivacId, update: &UpdateVivac) -> Result<VivacPoint, DomainError> {
        let mut model = vivac_points::ActiveModel {
            id: Set(id.0),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        if let Some(ref name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(ref description) = update.description {
            model.description = Set(Some(description.clone()));
        }
        if let Some(elevation) = update.elevation {
            model.elevation = Set(Some(elevation));
        }
        if let Some(difficulty) = update.access_difficulty {
            model.access_difficulty = Set(difficulty.to_string());
        }
        if let Some(environment) = update.environment {
            model.environment = Set(Some(environment.to_string()));
        }
        if let Some(privacity) = update.privacity {
            model.privacity = Set(Some(privacity.to_string()));
        }
        if let Some(terrain) = update.terrain_type {
            model.terrain_type = Set(Some(terrain.to_string()));
        }
        if let Some(pet_friendly) = update.pet_friendly {
            model.pet_friendly = Set(pet_friendly);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn set_photo_urls(&self, id: &VivacId, urls: &[String]) -> Result<(), DomainError> {
        vivac_points::ActiveModel {
            id: Set(id.0),
            photo_urls: Set(serde_json::json!(urls)),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn set_rating_stats(
        &self,
        id: &VivacId,
        avg_rating: Option<f64>,
        review_count: i32,
    ) -> Result<(), DomainError> {
        vivac_points::ActiveModel {
            id: Set(id.0),
            avg_rating: Set(avg_rating),
            review_count: Set(review_count),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &VivacId) -> Result<(), DomainError> {
        vivac_points::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<vivac_points::Model> for VivacPoint {
    fn from(model: vivac_points::Model) -> Self {
        VivacPoint {
            id: VivacId(model.id),
            name: model.name,
            description: model.description,
            latitude: model.latitude,
            longitude: model.longitude,
            elevation: model.elevation,
            access_difficulty: model
                .access_difficulty
                .parse()
                .unwrap_or(AccessDifficulty::Easy),
            environment: model.environment.and_then(|s| s.parse().ok()),
            privacity: model.privacity.and_then(|s| s.parse().ok()),
            terrain_type: model.terrain_type.and_then(|s| s.parse().ok()),
            photo_urls: serde_json::from_value(model.photo_urls).unwrap_or_default(),
            pet_friendly: model.pet_friendly,
            avg_rating: model.avg_rating,
            review_count: model.review_count,
            created_by: UserId(model.created_by),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
