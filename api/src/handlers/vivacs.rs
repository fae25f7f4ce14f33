//! Vivac point handlers
//!
//! CRUD for camp spots, the filtered geo listing and photo management.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::domain::entities::{
    AccessDifficulty, Environment, GeoFilter, NewVivac, Privacity, TerrainType, UpdateVivac,
    UserId, VivacFilter, VivacId, VivacPoint,
};
use crate::error::AppError;
use crate::AppState;

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for the vivac listing.
/// `lat`, `lon` and `radius_km` must be given together to enable the
/// geo filter.
#[derive(Debug, Default, Deserialize)]
pub struct ListVivacsQuery {
    pub privacity: Option<Privacity>,
    pub access_difficulty: Option<AccessDifficulty>,
    pub min_elevation: Option<i32>,
    pub max_elevation: Option<i32>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius_km: Option<f64>,
}

impl ListVivacsQuery {
    fn into_filter(self) -> Result<VivacFilter, AppError> {
        let geo = match (self.lat, self.lon, self.radius_km) {
            (Some(lat), Some(lon), Some(radius_km)) => Some(GeoFilter {
                lat,
                lon,
                radius_km,
            }),
            (None, None, None) => None,
            _ => {
                return Err(AppError::BadRequest(
                    "lat, lon and radius_km must be provided together".to_string(),
                ))
            }
        };

        Ok(VivacFilter {
            privacity: self.privacity,
            access_difficulty: self.access_difficulty,
            min_elevation: self.min_elevation,
            max_elevation: self.max_elevation,
            geo,
        })
    }
}

/// Request to create a vivac point
#[derive(Debug, Deserialize)]
pub struct CreateVivacRequest {
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<i32>,
    pub access_difficulty: AccessDifficulty,
    pub environment: Option<Environment>,
    pub privacity: Option<Privacity>,
    pub terrain_type: Option<TerrainType>,
    #[serde(default)]
    pub pet_friendly: bool,
}

/// Request to delete a photo by its delivery URL
#[derive(Debug, Deserialize)]
pub struct RemovePhotoRequest {
    pub image_url: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /vivacs
pub async fn list_vivacs(
    State(state): State<AppState>,
    Query(query): Query<ListVivacsQuery>,
) -> Result<Json<Vec<VivacPoint>>, AppError> {
    let vivacs = state.vivac_service.list(query.into_filter()?).await?;
    Ok(Json(vivacs))
}

/// GET /vivacs/:id
pub async fn get_vivac(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VivacPoint>, AppError> {
    let vivac = state.vivac_service.get(&VivacId(id)).await?;
    Ok(Json(vivac))
}

/// GET /vivacs/user/:user_id
pub async fn list_vivacs_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<VivacPoint>>, AppError> {
    let vivacs = state.vivac_service.by_user(&UserId(user_id)).await?;
    Ok(Json(vivacs))
}

/// POST /vivacs
pub async fn create_vivac(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateVivacRequest>,
) -> Result<(StatusCode, Json<VivacPoint>), AppError> {
    let vivac = state
        .vivac_service
        .create(NewVivac {
            name: request.name,
            description: request.description,
            latitude: request.latitude,
            longitude: request.longitude,
            elevation: request.elevation,
            access_difficulty: request.access_difficulty,
            environment: request.environment,
            privacity: request.privacity,
            terrain_type: request.terrain_type,
            photo_urls: Vec::new(),
            pet_friendly: request.pet_friendly,
            created_by: auth.id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(vivac)))
}

/// PATCH /vivacs/:id
pub async fn update_vivac(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateVivac>,
) -> Result<Json<VivacPoint>, AppError> {
    let vivac = state
        .vivac_service
        .update(&VivacId(id), &auth.id, update)
        .await?;
    Ok(Json(vivac))
}

/// DELETE /vivacs/:id
pub async fn delete_vivac(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.vivac_service.delete(&VivacId(id), &auth.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /vivacs/:id/photos
///
/// Multipart upload; the first file field is stored in the CDN and its
/// delivery URL appended to the vivac.
pub async fn add_photo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<VivacPoint>, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
        .ok_or_else(|| AppError::BadRequest("Missing file field".to_string()))?;

    let file_name = field
        .file_name()
        .unwrap_or("upload")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("Empty upload".to_string()));
    }

    let vivac = state
        .vivac_service
        .add_photo(&VivacId(id), &auth.id, bytes.to_vec(), &file_name)
        .await?;
    Ok(Json(vivac))
}

/// DELETE /vivacs/:id/photos
pub async fn remove_photo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<RemovePhotoRequest>,
) -> Result<Json<VivacPoint>, AppError> {
    let vivac = state
        .vivac_service
        .remove_photo(&VivacId(id), &auth.id, &request.image_url)
        .await?;
    Ok(Json(vivac))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_query_requires_all_three_params() {
        let query = ListVivacsQuery {
            lat: Some(38.7),
            ..Default::default()
        };
        assert!(query.into_filter().is_err());

        let query = ListVivacsQuery {
            lat: Some(38.7),
            lon: Some(-0.47),
            radius_km: Some(5.0),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert!(filter.geo.is_some());
    }

    #[test]
    fn filter_enums_parse_from_query_strings() {
        let query: ListVivacsQuery =
            serde_urlencoded::from_str("privacity=REMOTE&access_difficulty=HARD").unwrap();
        assert_eq!(query.privacity, Some(Privacity::Remote));
        assert_eq!(query.access_difficulty, Some(AccessDifficulty::Hard));
    }
}
