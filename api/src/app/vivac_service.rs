//! Vivac point service
//!
//! CRUD with creator-only guards, the two-phase geo filter, photo management
//! through the image store, and the XP/achievement side effects of creating
//! and deleting spots.

use std::sync::Arc;

use crate::app::achievement_service::AchievementService;
use crate::app::xp_config::XP_VIVAC_CREATED;
use crate::domain::entities::{
    validate_coordinates, CounterKind, NewVivac, UpdateVivac, UserId, VivacFilter, VivacId,
    VivacPoint,
};
use crate::domain::ports::{
    AchievementRepository, ImageStore, UserRepository, VivacRepository,
};
use crate::error::{AppError, DomainError};

/// Service for vivac points
pub struct VivacService<VR, UR, AR, IS>
where
    VR: VivacRepository,
    UR: UserRepository,
    AR: AchievementRepository,
    IS: ImageStore,
{
    vivacs: Arc<VR>,
    users: Arc<UR>,
    achievements: Arc<AchievementService<AR, UR>>,
    images: Arc<IS>,
}

impl<VR, UR, AR, IS> VivacService<VR, UR, AR, IS>
where
    VR: VivacRepository,
    UR: UserRepository,
    AR: AchievementRepository,
    IS: ImageStore,
{
    pub fn new(
        vivacs: Arc<VR>,
        users: Arc<UR>,
        achievements: Arc<AchievementService<AR, UR>>,
        images: Arc<IS>,
    ) -> Self {
        Self {
            vivacs,
            users,
            achievements,
            images,
        }
    }

    /// Create a vivac point. Grants base XP and runs the vivac milestone
    /// check for the creator.
    pub async fn create(&self, vivac: NewVivac) -> Result<VivacPoint, AppError> {
        if vivac.name.trim().is_empty() || vivac.name.len() > 100 {
            return Err(AppError::BadRequest(
                "Name must be between 1 and 100 characters".to_string(),
            ));
        }
        validate_coordinates(vivac.latitude, vivac.longitude)
            .map_err(AppError::BadRequest)?;

        let created = self.vivacs.create(&vivac).await?;

        let count = self
            .users
            .adjust_vivac_count(&vivac.created_by, 1, XP_VIVAC_CREATED)
            .await?;
        self.achievements
            .check_unlocks(&vivac.created_by, CounterKind::VivacsCreated, count)
            .await?;

        tracing::info!(vivac = %created.id, user = %vivac.created_by, "vivac created");
        Ok(created)
    }

    /// Listing with attribute filters plus the two-phase geo filter: the
    /// repository applies the padded bounding box in SQL, the Haversine
    /// refinement happens here.
    pub async fn list(&self, filter: VivacFilter) -> Result<Vec<VivacPoint>, AppError> {
        if let Some(ref geo) = filter.geo {
            validate_coordinates(geo.lat, geo.lon).map_err(AppError::BadRequest)?;
            if geo.radius_km <= 0.0 {
                return Err(AppError::BadRequest(
                    "Radius must be positive".to_string(),
                ));
            }
        }

        let candidates = self.vivacs.find_filtered(&filter).await?;

        let result = match filter.geo {
            Some(geo) => candidates
                .into_iter()
                .filter(|v| geo.contains(v.latitude, v.longitude))
                .collect(),
            None => candidates,
        };

        Ok(result)
    }

    pub async fn get(&self, id: &VivacId) -> Result<VivacPoint, AppError> {
        self.vivacs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vivac point".to_string()))
    }

    pub async fn by_user(&self, user_id: &UserId) -> Result<Vec<VivacPoint>, AppError> {
        Ok(self.vivacs.find_by_creator(user_id).await?)
    }

    /// Update a vivac; only its creator may
    pub async fn update(
        &self,
        id: &VivacId,
        caller: &UserId,
        update: UpdateVivac,
    ) -> Result<VivacPoint, AppError> {
        self.owned_by(id, caller).await?;

        if let Some(ref name) = update.name {
            if name.trim().is_empty() || name.len() > 100 {
                return Err(AppError::BadRequest(
                    "Name must be between 1 and 100 characters".to_string(),
                ));
            }
        }

        Ok(self.vivacs.update(id, &update).await?)
    }

    /// Delete a vivac; only its creator may. Takes back the base XP, but
    /// unlocked achievements stay unlocked.
    pub async fn delete(&self, id: &VivacId, caller: &UserId) -> Result<(), AppError> {
        let vivac = self.owned_by(id, caller).await?;

        self.vivacs.delete(id).await?;
        self.users
            .adjust_vivac_count(caller, -1, -XP_VIVAC_CREATED)
            .await?;

        // Best-effort CDN cleanup; the record is already gone
        for url in &vivac.photo_urls {
            if let Ok(public_id) = self.images.public_id_from_url(url) {
                if let Err(e) = self.images.delete(&public_id).await {
                    tracing::warn!(error = %e, url, "failed to delete photo from CDN");
                }
            }
        }

        tracing::info!(vivac = %id, user = %caller, "vivac deleted");
        Ok(())
    }

    /// Upload a photo and append its URL
    pub async fn add_photo(
        &self,
        id: &VivacId,
        caller: &UserId,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<VivacPoint, AppError> {
        let vivac = self.owned_by(id, caller).await?;

        let stored = self.images.upload(bytes, file_name).await?;

        let mut urls = vivac.photo_urls;
        urls.push(stored.url);
        self.vivacs.set_photo_urls(id, &urls).await?;

        self.get(id).await
    }

    /// Delete a photo from the CDN and drop its URL
    pub async fn remove_photo(
        &self,
        id: &VivacId,
        caller: &UserId,
        image_url: &str,
    ) -> Result<VivacPoint, AppError> {
        let vivac = self.owned_by(id, caller).await?;

        if !vivac.photo_urls.iter().any(|u| u == image_url) {
            return Err(AppError::NotFound("Photo".to_string()));
        }

        let public_id = self.images.public_id_from_url(image_url)?;
        self.images.delete(&public_id).await?;

        let urls: Vec<String> = vivac
            .photo_urls
            .into_iter()
            .filter(|u| u != image_url)
            .collect();
        self.vivacs.set_photo_urls(id, &urls).await?;

        self.get(id).await
    }

    /// Load the vivac and check the caller created it
    async fn owned_by(&self, id: &VivacId, caller: &UserId) -> Result<VivacPoint, AppError> {
        let vivac = self.get(id).await?;
        if vivac.created_by != *caller {
            return Err(AppError::Domain(DomainError::Forbidden(
                "Only the creator can modify this vivac".to_string(),
            )));
        }
        Ok(vivac)
    }
}
