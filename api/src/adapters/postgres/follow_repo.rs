//! PostgreSQL adapter for FollowRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{FollowEntry, FollowId, FollowProfile, UserFollow, UserId};
use crate::domain::ports::FollowRepository;
use crate::entity::{user_follows, users};
use crate::error::DomainError;

/// PostgreSQL implementation of FollowRepository
pub struct PostgresFollowRepository {
    db: DatabaseConnection,
}

impl PostgresFollowRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load the profiles referenced by the given edges and pair them up,
    /// preserving edge order.
    async fn with_profiles(
        &self,
        edges: Vec<user_follows::Model>,
        pick: fn(&user_follows::Model) -> Uuid,
    ) -> Result<Vec<FollowEntry>, DomainError> {
        let ids: Vec<Uuid> = edges.iter().map(pick).collect();

        let profiles: HashMap<Uuid, FollowProfile> = users::Entity::find()
            .filter(users::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    FollowProfile {
                        id: UserId(u.id),
                        user_name: u.user_name,
                        avatar_url: u.avatar_url,
                    },
                )
            })
            .collect();

        Ok(edges
            .into_iter()
            .filter_map(|edge| {
                let user = profiles.get(&pick(&edge))?.clone();
                Some(FollowEntry {
                    id: FollowId(edge.id),
                    created_at: edge.created_at.with_timezone(&Utc),
                    user,
                })
            })
            .collect())
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn find_edge(
        &self,
        follower_id: &UserId,
        followed_id: &UserId,
    ) -> Result<Option<UserFollow>, DomainError> {
        let result = user_follows::Entity::find()
            .filter(user_follows::Column::FollowerId.eq(follower_id.0))
            .filter(user_follows::Column::FollowedId.eq(followed_id.0))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn create(
        &self,
        follower_id: &UserId,
        followed_id: &UserId,
    ) -> Result<UserFollow, DomainError> {
        let model = user_follows::ActiveModel {
            id: Set(Uuid::new_v4()),
            follower_id: Set(follower_id.0),
            followed_id: Set(followed_id.0),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(
        &self,
        follower_id: &UserId,
        followed_id: &UserId,
    ) -> Result<(), DomainError> {
        user_follows::Entity::delete_many()
            .filter(user_follows::Column::FollowerId.eq(follower_id.0))
            .filter(user_follows::Column::FollowedId.eq(followed_id.0))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn find_followers(&self, user_id: &UserId) -> Result<Vec<FollowEntry>, DomainError> {
        let edges = user_follows::Entity::find()
            .filter(user_follows::Column::FollowedId.eq(user_id.0))
            .order_by_desc(user_follows::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        self.with_profiles(edges, |e| e.follower_id).await
    }

    async fn find_following(&self, user_id: &UserId) -> Result<Vec<FollowEntry>, DomainError> {
        let edges = user_follows::Entity::find()
            .filter(user_follows::Column::FollowerId.eq(user_id.0))
            .order_by_desc(user_follows::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        self.with_profiles(edges, |e| e.followed_id).await
    }

    async fn count_followers(&self, user_id: &UserId) -> Result<i64, DomainError> {
        let count = user_follows::Entity::find()
            .filter(user_follows::Column::FollowedId.eq(user_id.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count as i64)
    }

    async fn count_following(&self, user_id: &UserId) -> Result<i64, DomainError> {
        let count = user_follows::Entity::find()
            .filter(user_follows::Column::FollowerId.eq(user_id.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(count as i64)
    }
}

/// Convert SeaORM model to domain entity
impl From<user_follows::Model> for UserFollow {
    fn from(model: user_follows::Model) -> Self {
        UserFollow {
            id: FollowId(model.id),
            follower_id: UserId(model.follower_id),
            followed_id: UserId(model.followed_id),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
