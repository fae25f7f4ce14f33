//! Rating handlers
//!
//! One rating per user per vivac; stats and XP bookkeeping happen in the
//! service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::{RatingWithAuthor, RatingWithVivac};
use crate::auth::AuthUser;
use crate::domain::entities::{Rating, RatingId, UserId, VivacId};
use crate::error::AppError;
use crate::AppState;

/// Request to rate a vivac
#[derive(Debug, Deserialize)]
pub struct CreateRatingRequest {
    pub vivac_point_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Request to update a rating
#[derive(Debug, Deserialize)]
pub struct UpdateRatingRequest {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}

/// POST /ratings
pub async fn create_rating(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateRatingRequest>,
) -> Result<(StatusCode, Json<Rating>), AppError> {
    let rating = state
        .rating_service
        .create(
            &auth.id,
            &VivacId(request.vivac_point_id),
            request.rating,
            request.comment,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(rating)))
}

/// PATCH /ratings/:id
pub async fn update_rating(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRatingRequest>,
) -> Result<Json<Rating>, AppError> {
    let rating = state
        .rating_service
        .update(&RatingId(id), &auth.id, request.rating, request.comment)
        .await?;
    Ok(Json(rating))
}

/// DELETE /ratings/:id
pub async fn delete_rating(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.rating_service.delete(&RatingId(id), &auth.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /ratings/vivac/:vivac_id
pub async fn list_ratings_by_vivac(
    State(state): State<AppState>,
    Path(vivac_id): Path<Uuid>,
) -> Result<Json<Vec<RatingWithAuthor>>, AppError> {
    let ratings = state.rating_service.by_vivac(&VivacId(vivac_id)).await?;
    Ok(Json(ratings))
}

/// GET /ratings/user/:user_id
pub async fn list_ratings_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<RatingWithVivac>>, AppError> {
    let ratings = state.rating_service.by_user(&UserId(user_id)).await?;
    Ok(Json(ratings))
}
