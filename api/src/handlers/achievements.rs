//! Achievement handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::domain::entities::{Achievement, UnlockedAchievement, UserId};
use crate::error::AppError;
use crate::AppState;

/// GET /achievements
pub async fn list_achievements(
    State(state): State<AppState>,
) -> Result<Json<Vec<Achievement>>, AppError> {
    let catalog = state.achievement_service.catalog().await?;
    Ok(Json(catalog))
}

/// GET /achievements/users/:user_id
pub async fn list_unlocked(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<UnlockedAchievement>>, AppError> {
    let unlocked = state
        .achievement_service
        .unlocked(&UserId(user_id))
        .await?;
    Ok(Json(unlocked))
}
