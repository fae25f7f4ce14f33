//! PostgreSQL adapter for FavoriteRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{
    FavoriteFolder, FavoriteId, FavoriteWithVivac, FolderId, UserFavorite, UserId, VivacId,
    VivacPoint,
};
use crate::domain::ports::FavoriteRepository;
use crate::entity::{favorite_folders, user_favorites, vivac_points};
use crate::error::DomainError;

/// PostgreSQL implementation of FavoriteRepository
pub struct PostgresFavoriteRepository {
    db: DatabaseConnection,
}

impl PostgresFavoriteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteRepository for PostgresFavoriteRepository {
    async fn find_folder(&self, id: &FolderId) -> Result<Option<FavoriteFolder>, DomainError> {
        let result = favorite_folders::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_folder_by_name(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<Option<FavoriteFolder>, DomainError> {
        let result = favorite_folders::Entity::find()
            .filter(favorite_folders::Column::UserId.eq(user_id.0))
            .filter(favorite_folders::Column::Name.eq(name.trim()))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_folders(&self, user_id: &UserId) -> Result<Vec<FavoriteFolder>, DomainError> {
        let results = favorite_folders::Entity::find()
            .filter(favorite_folders::Column::UserId.eq(user_id.0))
            .order_by_desc(favorite_folders::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create_folder(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<FavoriteFolder, DomainError> {
        let model = favorite_folders::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.trim().to_string()),
            user_id: Set(user_id.0),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete_folder(&self, id: &FolderId) -> Result<(), DomainError> {
        user_favorites::Entity::delete_many()
            .filter(user_favorites::Column::FolderId.eq(id.0))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        favorite_folders::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_favorite(&self, id: &FavoriteId) -> Result<Option<UserFavorite>, DomainError> {
        let result = user_favorites::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_favorite_in_folder(
        &self,
        folder_id: &FolderId,
        vivac_id: &VivacId,
    ) -> Result<Option<UserFavorite>, DomainError> {
        let result = user_favorites::Entity::find()
            .filter(user_favorites::Column::FolderId.eq(folder_id.0))
            .filter(user_favorites::Column::VivacId.eq(vivac_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_favorites(
        &self,
        folder_id: &FolderId,
    ) -> Result<Vec<FavoriteWithVivac>, DomainError> {
        let favorites = user_favorites::Entity::find()
            .filter(user_favorites::Column::FolderId.eq(folder_id.0))
            .order_by_desc(user_favorites::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let vivac_ids: Vec<Uuid> = favorites.iter().map(|f| f.vivac_id).collect();

        let vivacs: HashMap<Uuid, VivacPoint> = vivac_points::Entity::find()
            .filter(vivac_points::Column::Id.is_in(vivac_ids))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .into_iter()
            .map(|m| (m.id, m.into()))
            .collect();

        // Favorites whose vivac was deleted are skipped
        Ok(favorites
            .into_iter()
            .filter_map(|f| {
                let vivac = vivacs.get(&f.vivac_id)?.clone();
                Some(FavoriteWithVivac {
                    id: FavoriteId(f.id),
                    folder_id: FolderId(f.folder_id),
                    created_at: f.created_at.with_timezone(&Utc),
                    vivac,
                })
            })
            .collect())
    }

    async fn create_favorite(
        &self,
        folder_id: &FolderId,
        vivac_id: &VivacId,
    ) -> Result<UserFavorite, DomainError> {
        let model = user_favorites::ActiveModel {
            id: Set(Uuid::new_v4()),
            folder_id: Set(folder_id.0),
            vivac_id: Set(vivac_id.0),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete_favorite(&self, id: &FavoriteId) -> Result<(), DomainError> {
        user_favorites::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn move_favorite(
        &self,
        id: &FavoriteId,
        folder_id: &FolderId,
    ) -> Result<UserFavorite, DomainError> {
        let result = user_favorites::ActiveModel {
            id: Set(id.0),
            folder_id: Set(folder_id.0),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }
}

/// Convert SeaORM models to domain entities
impl From<favorite_folders::Model> for FavoriteFolder {
    fn from(model: favorite_folders::Model) -> Self {
        FavoriteFolder {
            id: FolderId(model.id),
            name: model.name,
            user_id: UserId(model.user_id),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<user_favorites::Model> for UserFavorite {
    fn from(model: user_favorites::Model) -> Self {
        UserFavorite {
            id: FavoriteId(model.id),
            folder_id: FolderId(model.folder_id),
            vivac_id: VivacId(model.vivac_id),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
