//! Google ID token verification via the tokeninfo endpoint

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::ports::{GoogleIdentity, GoogleTokenVerifier};
use crate::error::GoogleAuthError;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Verifies Google ID tokens against the configured OAuth client id
pub struct GoogleTokeninfoVerifier {
    client: reqwest::Client,
    client_id: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleTokeninfoVerifier {
    pub fn new(client_id: String) -> Self {
        Self::with_base_url(client_id, TOKENINFO_URL.to_string())
    }

    pub fn with_base_url(client_id: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            client_id,
            base_url,
        }
    }
}

#[async_trait]
impl GoogleTokenVerifier for GoogleTokeninfoVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, GoogleAuthError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        // tokeninfo answers 400 for malformed or expired tokens
        if !response.status().is_success() {
            return Err(GoogleAuthError::InvalidToken);
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| GoogleAuthError::Deserialization(e.to_string()))?;

        if info.aud != self.client_id {
            tracing::warn!(aud = %info.aud, "google token audience mismatch");
            return Err(GoogleAuthError::AudienceMismatch);
        }

        Ok(GoogleIdentity {
            google_id: info.sub,
            email: info.email.to_lowercase(),
            name: info.name,
            picture: info.picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokeninfo_payload() {
        let json = r#"{
            "aud": "client-id.apps.googleusercontent.com",
            "sub": "110169484474386276334",
            "email": "user@gmail.com",
            "name": "Test User",
            "picture": "https://lh3.googleusercontent.com/a/photo.jpg",
            "iss": "https://accounts.google.com",
            "exp": "1700000000"
        }"#;

        let info: TokenInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.sub, "110169484474386276334");
        assert_eq!(info.aud, "client-id.apps.googleusercontent.com");
        assert_eq!(info.name.as_deref(), Some("Test User"));
    }

    #[test]
    fn tokeninfo_optional_fields_can_be_absent() {
        let json = r#"{
            "aud": "client-id",
            "sub": "123",
            "email": "user@gmail.com"
        }"#;

        let info: TokenInfo = serde_json::from_str(json).unwrap();
        assert!(info.name.is_none());
        assert!(info.picture.is_none());
    }
}
