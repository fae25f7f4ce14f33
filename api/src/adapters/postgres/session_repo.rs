//! PostgreSQL adapters for sessions and password-reset tokens

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::domain::entities::{NewSession, PasswordResetToken, Session, UserId};
use crate::domain::ports::{PasswordResetRepository, SessionRepository};
use crate::entity::{password_reset_tokens, user_sessions};
use crate::error::DomainError;

/// PostgreSQL implementation of SessionRepository
pub struct PostgresSessionRepository {
    db: DatabaseConnection,
}

impl PostgresSessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn create(&self, session: &NewSession) -> Result<Session, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = user_sessions::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(session.user_id.0),
            refresh_token: Set(session.refresh_token.clone()),
            expires_at: Set(session.expires_at.fixed_offset()),
            ip_address: Set(session.ip_address.clone()),
            user_agent: Set(session.user_agent.clone()),
            created_at: Set(now),
            last_used_at: Set(now),
            revoked: Set(false),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn find_by_token(&self, refresh_token: &str) -> Result<Option<Session>, DomainError> {
        let result = user_sessions::Entity::find()
            .filter(user_sessions::Column::RefreshToken.eq(refresh_token))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn revoke_by_token(&self, refresh_token: &str) -> Result<(), DomainError> {
        let session = user_sessions::Entity::find()
            .filter(user_sessions::Column::RefreshToken.eq(refresh_token))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?
            .ok_or_else(|| DomainError::NotFound("Session".to_string()))?;

        user_sessions::ActiveModel {
            id: Set(session.id),
            revoked: Set(true),
            last_used_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<(), DomainError> {
        user_sessions::Entity::update_many()
            .col_expr(user_sessions::Column::Revoked, Expr::value(true))
            .filter(user_sessions::Column::UserId.eq(user_id.0))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = user_sessions::Entity::delete_many()
            .filter(user_sessions::Column::ExpiresAt.lt(now.fixed_offset()))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

/// PostgreSQL implementation of PasswordResetRepository
pub struct PostgresPasswordResetRepository {
    db: DatabaseConnection,
}

impl PostgresPasswordResetRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PasswordResetRepository for PostgresPasswordResetRepository {
    async fn create(
        &self,
        user_id: &UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken, DomainError> {
        let model = password_reset_tokens::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id.0),
            token: Set(token.to_string()),
            created_at: Set(Utc::now().fixed_offset()),
            expires_at: Set(expires_at.fixed_offset()),
            used: Set(false),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn find_unused(&self, token: &str) -> Result<Option<PasswordResetToken>, DomainError> {
        let result = password_reset_tokens::Entity::find()
            .filter(password_reset_tokens::Column::Token.eq(token))
            .filter(password_reset_tokens::Column::Used.eq(false))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn mark_used(&self, id: &Uuid) -> Result<(), DomainError> {
        password_reset_tokens::ActiveModel {
            id: Set(*id),
            used: Set(true),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM models to domain entities
impl From<user_sessions::Model> for Session {
    fn from(model: user_sessions::Model) -> Self {
        Session {
            id: model.id,
            user_id: UserId(model.user_id),
            refresh_token: model.refresh_token,
            expires_at: model.expires_at.with_timezone(&Utc),
            ip_address: model.ip_address,
            user_agent: model.user_agent,
            created_at: model.created_at.with_timezone(&Utc),
            last_used_at: model.last_used_at.with_timezone(&Utc),
            revoked: model.revoked,
        }
    }
}

impl From<password_reset_tokens::Model> for PasswordResetToken {
    fn from(model: password_reset_tokens::Model) -> Self {
        PasswordResetToken {
            id: model.id,
            user_id: UserId(model.user_id),
            token: model.token,
            created_at: model.created_at.with_timezone(&Utc),
            expires_at: model.expires_at.with_timezone(&Utc),
            used: model.used,
        }
    }
}
