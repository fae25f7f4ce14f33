//! Authentication handlers
//!
//! Registration, login (password and Google), refresh-token rotation and the
//! password-reset flow.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::{ClientInfo, TokenPair};
use crate::domain::entities::User;
use crate::error::AppError;
use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to register a new account
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

/// Request to log in with email and password
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request to log in with a Google ID token
#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    pub id_token: String,
}

/// Request carrying a refresh token (refresh, logout)
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Request to start a password reset
#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Request to complete a password reset
#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirm {
    pub token: String,
    pub new_password: String,
}

/// Authenticated user with fresh tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthResponse {
    fn new(user: User, tokens: TokenPair) -> Self {
        Self {
            user,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

fn client_info(addr: SocketAddr, headers: &HeaderMap) -> ClientInfo {
    ClientInfo {
        ip_address: Some(addr.ip().to_string()),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let (user, tokens) = state
        .auth_service
        .register(
            &request.user_name,
            &request.email,
            &request.password,
            client_info(addr, &headers),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, tokens))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (user, tokens) = state
        .auth_service
        .login(&request.email, &request.password, client_info(addr, &headers))
        .await?;

    Ok(Json(AuthResponse::new(user, tokens)))
}

/// POST /auth/google
pub async fn google_login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<GoogleLoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let (user, tokens) = state
        .auth_service
        .google_login(&request.id_token, client_info(addr, &headers))
        .await?;

    Ok(Json(AuthResponse::new(user, tokens)))
}

/// POST /auth/refresh
///
/// Rotates the refresh token: the presented session is revoked and a new
/// pair is issued.
pub async fn refresh(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let tokens = state
        .auth_service
        .refresh(&request.refresh_token, client_info(addr, &headers))
        .await?;

    Ok(Json(tokens))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<StatusCode, AppError> {
    state.auth_service.logout(&request.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /auth/password-reset/request
///
/// Always answers 204 so the endpoint does not leak which emails exist.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<StatusCode, AppError> {
    state.auth_service.forgot_password(&request.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /auth/password-reset/confirm
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(request): Json<PasswordResetConfirm>,
) -> Result<StatusCode, AppError> {
    state
        .auth_service
        .reset_password(&request.token, &request.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
