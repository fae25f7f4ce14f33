//! Auth service
//!
//! Handles registration, login (password and Google), refresh-token
//! sessions, logout, and the password-reset flow.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;

use crate::auth::JwtKeys;
use crate::domain::entities::{NewSession, NewUser, UpdateUser, User, UserId};
use crate::domain::ports::{
    GoogleTokenVerifier, Mailer, PasswordResetRepository, SessionRepository, UserRepository,
};
use crate::error::{AppError, DomainError};

/// Reset tokens are single-use and short-lived
const RESET_TOKEN_TTL_MINS: i64 = 15;

/// Matches the cost the existing password hashes were produced with
const BCRYPT_COST: u32 = 10;

/// Access + refresh token pair handed out on login
#[derive(Debug, Clone, serde::Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Request metadata recorded with each session
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Service for authentication and session management
pub struct AuthService<UR, SR, PR, GV, M>
where
    UR: UserRepository,
    SR: SessionRepository,
    PR: PasswordResetRepository,
    GV: GoogleTokenVerifier,
    M: Mailer,
{
    users: Arc<UR>,
    sessions: Arc<SR>,
    resets: Arc<PR>,
    google: Option<Arc<GV>>,
    mailer: Arc<M>,
    jwt_keys: Arc<JwtKeys>,
    refresh_ttl_days: i64,
}

impl<UR, SR, PR, GV, M> AuthService<UR, SR, PR, GV, M>
where
    UR: UserRepository,
    SR: SessionRepository,
    PR: PasswordResetRepository,
    GV: GoogleTokenVerifier,
    M: Mailer,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<UR>,
        sessions: Arc<SR>,
        resets: Arc<PR>,
        google: Option<Arc<GV>>,
        mailer: Arc<M>,
        jwt_keys: Arc<JwtKeys>,
        refresh_ttl_days: i64,
    ) -> Self {
        Self {
            users,
            sessions,
            resets,
            google,
            mailer,
            jwt_keys,
            refresh_ttl_days,
        }
    }

    /// Register a new account with email and password
    pub async fn register(
        &self,
        user_name: &str,
        email: &str,
        password: &str,
        client: ClientInfo,
    ) -> Result<(User, TokenPair), AppError> {
        let user_name = user_name.trim();
        let email = email.trim().to_lowercase();

        if user_name.is_empty() || user_name.len() > 50 {
            return Err(AppError::BadRequest(
                "Username must be between 1 and 50 characters".to_string(),
            ));
        }
        validate_email(&email)?;
        validate_password(password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "User with email '{}' already exists",
                email
            ))));
        }
        if self.users.find_by_user_name(user_name).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "Username '{}' is taken",
                user_name
            ))));
        }

        let password_hash = bcrypt::hash(password, BCRYPT_COST)
            .map_err(|e| AppError::Internal(format!("Hashing failed: {}", e)))?;

        let user = self
            .users
            .create(&NewUser {
                user_name: user_name.to_string(),
                email,
                password_hash: Some(password_hash),
                google_id: None,
            })
            .await?;

        tracing::info!(user = %user.id, "user registered");

        let tokens = self.open_session(&user.id, client).await?;
        Ok((user, tokens))
    }

    /// Log in with email and password
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        client: ClientInfo,
    ) -> Result<(User, TokenPair), AppError> {
        let email = email.trim().to_lowercase();

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        // Google-only accounts have no password to check
        let hash = user.password_hash.as_deref().ok_or(AppError::Unauthorized)?;

        let valid = bcrypt::verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Hash verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::Unauthorized);
        }

        tracing::info!(user = %user.id, "user logged in");

        let tokens = self.open_session(&user.id, client).await?;
        Ok((user, tokens))
    }

    /// Log in (or register) with a Google ID token
    pub async fn google_login(
        &self,
        id_token: &str,
        client: ClientInfo,
    ) -> Result<(User, TokenPair), AppError> {
        let verifier = self
            .google
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("Google login is not configured".to_string()))?;

        let identity = verifier.verify(id_token).await?;

        // Existing Google account
        if let Some(user) = self.users.find_by_google_id(&identity.google_id).await? {
            let tokens = self.open_session(&user.id, client).await?;
            return Ok((user, tokens));
        }

        // Same email registered with a password: link the Google account
        if let Some(user) = self.users.find_by_email(&identity.email).await? {
            self.users.set_google_id(&user.id, &identity.google_id).await?;
            tracing::info!(user = %user.id, "google account linked");
            let tokens = self.open_session(&user.id, client).await?;
            return Ok((user, tokens));
        }

        // Fresh account
        let base_name = identity
            .name
            .as_deref()
            .map(|n| n.trim().replace(' ', "_"))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| {
                identity
                    .email
                    .split('@')
                    .next()
                    .unwrap_or("user")
                    .to_string()
            });
        let user_name = self.unique_user_name(&base_name).await?;

        let user = self
            .users
            .create(&NewUser {
                user_name,
                email: identity.email.clone(),
                password_hash: None,
                google_id: Some(identity.google_id.clone()),
            })
            .await?;

        if let Some(picture) = identity.picture {
            self.users
                .update(
                    &user.id,
                    &UpdateUser {
                        avatar_url: Some(picture),
                        ..Default::default()
                    },
                )
                .await?;
        }

        tracing::info!(user = %user.id, "user registered via google");

        let tokens = self.open_session(&user.id, client).await?;
        Ok((user, tokens))
    }

    /// Rotate a refresh token: the old session is revoked and a new one
    /// opened in its place.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        client: ClientInfo,
    ) -> Result<TokenPair, AppError> {
        let session = self
            .sessions
            .find_by_token(refresh_token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !session.is_valid(Utc::now()) {
            return Err(AppError::Unauthorized);
        }

        self.sessions.revoke_by_token(refresh_token).await?;
        self.open_session(&session.user_id, client).await
    }

    /// Revoke the session holding this refresh token
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        match self.sessions.revoke_by_token(refresh_token).await {
            Ok(()) => Ok(()),
            // Logout with an unknown token is a no-op
            Err(DomainError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Start the password-reset flow. Always succeeds from the caller's
    /// point of view so the endpoint does not leak which emails exist.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let email = email.trim().to_lowercase();

        let user = match self.users.find_by_email(&email).await? {
            Some(u) => u,
            None => {
                tracing::debug!("password reset requested for unknown email");
                return Ok(());
            }
        };

        let token = generate_token();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINS);
        self.resets.create(&user.id, &token, expires_at).await?;

        self.mailer.send_password_reset(&email, &token).await?;
        Ok(())
    }

    /// Complete the password-reset flow. Consumes the token and revokes
    /// every open session of the user.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        validate_password(new_password)?;

        let reset = self
            .resets
            .find_unused(token)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".to_string()))?;

        if !reset.is_valid(Utc::now()) {
            return Err(AppError::BadRequest(
                "Invalid or expired reset token".to_string(),
            ));
        }

        let hash = bcrypt::hash(new_password, BCRYPT_COST)
            .map_err(|e| AppError::Internal(format!("Hashing failed: {}", e)))?;

        self.users.set_password_hash(&reset.user_id, &hash).await?;
        self.resets.mark_used(&reset.id).await?;
        self.sessions.revoke_all_for_user(&reset.user_id).await?;

        tracing::info!(user = %reset.user_id, "password reset completed");
        Ok(())
    }

    /// Issue an access token and open a refresh session
    async fn open_session(
        &self,
        user_id: &UserId,
        client: ClientInfo,
    ) -> Result<TokenPair, AppError> {
        let access_token = self.jwt_keys.issue(user_id)?;
        let refresh_token = generate_token();

        self.sessions
            .create(&NewSession {
                user_id: *user_id,
                refresh_token: refresh_token.clone(),
                expires_at: Utc::now() + Duration::days(self.refresh_ttl_days),
                ip_address: client.ip_address,
                user_agent: client.user_agent,
            })
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Find a username that is not taken, appending a numeric suffix when
    /// needed.
    async fn unique_user_name(&self, base: &str) -> Result<String, AppError> {
        if self.users.find_by_user_name(base).await?.is_none() {
            return Ok(base.to_string());
        }
        for n in 1..1000 {
            let candidate = format!("{}{}", base, n);
            if self.users.find_by_user_name(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(AppError::Internal(
            "Could not derive a unique username".to_string(),
        ))
    }
}

/// Generate an opaque 256-bit token (refresh and reset tokens)
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Password policy: at least 8 characters with an uppercase letter, a digit,
/// and a symbol.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    let long_enough = password.chars().count() >= 8;
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_alphanumeric());

    if long_enough && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Password must be at least 8 characters and include an uppercase letter, \
             a number, and a symbol"
                .to_string(),
        ))
    }
}

/// Minimal email shape check
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let re = regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if re.is_match(email) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid email address".to_string()))
    }
}
