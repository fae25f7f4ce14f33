//! User profile handlers
//!
//! Own profile management, public profiles, the XP ranking and the preset
//! avatar catalog.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::{AvatarPreset, PublicProfile, Ranking};
use crate::auth::AuthUser;
use crate::domain::entities::{UpdateUser, User, UserId};
use crate::error::AppError;
use crate::AppState;

/// Request to update the caller's profile
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(flatten)]
    pub update: UpdateUser,
}

/// Request to select a preset avatar
#[derive(Debug, Deserialize)]
pub struct SelectAvatarRequest {
    pub avatar: String,
}

/// GET /users/me
pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>, AppError> {
    let user = state.user_service.me(&auth.id).await?;
    Ok(Json(user))
}

/// PATCH /users/me
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let user = state
        .user_service
        .update_profile(&auth.id, request.update)
        .await?;
    Ok(Json(user))
}

/// DELETE /users/me
///
/// Refused while the account still owns vivac points.
pub async fn delete_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    state.user_service.delete_account(&auth.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/:id
///
/// Public profile; `is_following` is filled in when the caller is
/// authenticated and not looking at themselves.
pub async fn get_public_profile(
    State(state): State<AppState>,
    viewer: Option<Extension<AuthUser>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicProfile>, AppError> {
    let viewer_id = viewer.map(|Extension(auth)| auth.id);
    let profile = state
        .user_service
        .public_profile(&UserId(id), viewer_id.as_ref())
        .await?;
    Ok(Json(profile))
}

/// GET /users/me/ranking
pub async fn get_ranking(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Ranking>, AppError> {
    let ranking = state.user_service.ranking(&auth.id).await?;
    Ok(Json(ranking))
}

/// GET /users/avatars
pub async fn list_avatars(State(state): State<AppState>) -> Json<Vec<AvatarPreset>> {
    Json(state.user_service.avatars())
}

/// POST /users/me/avatar
pub async fn select_avatar(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<SelectAvatarRequest>,
) -> Result<Json<User>, AppError> {
    let user = state
        .user_service
        .select_avatar(&auth.id, &request.avatar)
        .await?;
    Ok(Json(user))
}
