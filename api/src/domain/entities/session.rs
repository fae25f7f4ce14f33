//! Auth session and password-reset domain entities

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::UserId;

/// A server-side refresh-token session
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: UserId,
    #[serde(skip_serializing)]
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
    pub revoked: bool,
}

impl Session {
    /// A session is usable when it is neither revoked nor expired
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

/// Data needed to create a session
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: UserId,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A single-use password-reset token
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub user_id: UserId,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

impl PasswordResetToken {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at > now
    }
}
