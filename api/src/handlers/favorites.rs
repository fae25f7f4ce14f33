//! Favorites handlers
//!
//! Folders of saved vivacs; every operation checks folder ownership in the
//! service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::domain::entities::{
    FavoriteFolder, FavoriteId, FavoriteWithVivac, FolderId, UserFavorite, VivacId,
};
use crate::error::AppError;
use crate::AppState;

/// Request to create a favorite folder
#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
}

/// POST /favorites/folders
pub async fn create_folder(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<FavoriteFolder>), AppError> {
    let folder = state
        .favorites_service
        .create_folder(&auth.id, &request.name)
        .await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// GET /favorites/folders
pub async fn list_folders(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<FavoriteFolder>>, AppError> {
    let folders = state.favorites_service.folders(&auth.id).await?;
    Ok(Json(folders))
}

/// DELETE /favorites/folders/:folder_id
pub async fn delete_folder(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(folder_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .favorites_service
        .delete_folder(&FolderId(folder_id), &auth.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /favorites/folders/:folder_id
pub async fn folder_contents(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(folder_id): Path<Uuid>,
) -> Result<Json<Vec<FavoriteWithVivac>>, AppError> {
    let favorites = state
        .favorites_service
        .folder_contents(&FolderId(folder_id), &auth.id)
        .await?;
    Ok(Json(favorites))
}

/// POST /favorites/folders/:folder_id/add/:vivac_id
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((folder_id, vivac_id)): Path<(Uuid, Uuid)>,
) -> Result<(StatusCode, Json<UserFavorite>), AppError> {
    let favorite = state
        .favorites_service
        .add_favorite(&FolderId(folder_id), &auth.id, &VivacId(vivac_id))
        .await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

/// DELETE /favorites/:favorite_id
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(favorite_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .favorites_service
        .remove_favorite(&FavoriteId(favorite_id), &auth.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /favorites/:favorite_id/move/:folder_id
pub async fn move_favorite(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((favorite_id, folder_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<UserFavorite>, AppError> {
    let favorite = state
        .favorites_service
        .move_favorite(&FavoriteId(favorite_id), &auth.id, &FolderId(folder_id))
        .await?;
    Ok(Json(favorite))
}
