//! Follow handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::domain::entities::{FollowEntry, UserFollow, UserId};
use crate::error::AppError;
use crate::AppState;

/// POST /users/:target_id/follow
pub async fn follow_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(target_id): Path<Uuid>,
) -> Result<(StatusCode, Json<UserFollow>), AppError> {
    let edge = state
        .follow_service
        .follow(&auth.id, &UserId(target_id))
        .await?;
    Ok((StatusCode::CREATED, Json(edge)))
}

/// DELETE /users/:target_id/follow
pub async fn unfollow_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(target_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .follow_service
        .unfollow(&auth.id, &UserId(target_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /users/:user_id/followers
pub async fn list_followers(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<FollowEntry>>, AppError> {
    let followers = state.follow_service.followers(&UserId(user_id)).await?;
    Ok(Json(followers))
}

/// GET /users/:user_id/following
pub async fn list_following(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<FollowEntry>>, AppError> {
    let following = state.follow_service.following(&UserId(user_id)).await?;
    Ok(Json(following))
}
