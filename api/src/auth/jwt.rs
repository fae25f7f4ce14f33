//! JWT access tokens
//!
//! Short-lived HS256 access tokens carry the user id in `sub`. Long-lived
//! refresh tokens are opaque strings handled by the session repository, not
//! JWTs.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::UserId;
use crate::error::DomainError;

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
}

/// Pre-built encoding/decoding keys for HS256
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue an access token for the user
    pub fn issue(&self, user_id: &UserId) -> Result<String, DomainError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.0,
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| DomainError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Verify an access token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| DomainError::Unauthorized("Invalid or expired token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_verify_roundtrip() {
        let keys = JwtKeys::new("test-secret", 900);
        let user_id = UserId::new();

        let token = keys.issue(&user_id).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id.0);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let keys = JwtKeys::new("secret-a", 900);
        let other = JwtKeys::new("secret-b", 900);

        let token = keys.issue(&UserId::new()).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let keys = JwtKeys::new("test-secret", -60);
        let token = keys.issue(&UserId::new()).unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let keys = JwtKeys::new("test-secret", 900);
        assert!(keys.verify("not.a.jwt").is_err());
    }
}
