//! Standalone image upload handler
//!
//! Uploads go straight to the CDN; the returned public id can later be fed
//! to the vivac photo endpoints.

use axum::{extract::Multipart, extract::State, http::StatusCode, Json};

use crate::domain::ports::{ImageStore, StoredImage};
use crate::error::AppError;
use crate::AppState;

/// POST /images
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StoredImage>), AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
        .ok_or_else(|| AppError::BadRequest("Missing file field".to_string()))?;

    let file_name = field.file_name().unwrap_or("upload").to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("Empty upload".to_string()));
    }

    let stored = state.images.upload(bytes.to_vec(), &file_name).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
