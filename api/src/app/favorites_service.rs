//! Favorites service
//!
//! Named folders of saved vivac points, owned by a single user.

use std::sync::Arc;

use crate::domain::entities::{
    FavoriteFolder, FavoriteId, FavoriteWithVivac, FolderId, UserFavorite, UserId, VivacId,
};
use crate::domain::ports::{FavoriteRepository, VivacRepository};
use crate::error::{AppError, DomainError};

/// Service for favorite folders
pub struct FavoritesService<FR, VR>
where
    FR: FavoriteRepository,
    VR: VivacRepository,
{
    favorites: Arc<FR>,
    vivacs: Arc<VR>,
}

impl<FR, VR> FavoritesService<FR, VR>
where
    FR: FavoriteRepository,
    VR: VivacRepository,
{
    pub fn new(favorites: Arc<FR>, vivacs: Arc<VR>) -> Self {
        Self { favorites, vivacs }
    }

    /// Create a folder; folder names are unique per user
    pub async fn create_folder(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<FavoriteFolder, AppError> {
        let name = name.trim();
        if name.is_empty() || name.len() > 100 {
            return Err(AppError::BadRequest(
                "Folder name must be between 1 and 100 characters".to_string(),
            ));
        }
        if self
            .favorites
            .find_folder_by_name(user_id, name)
            .await?
            .is_some()
        {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "Folder '{}' already exists",
                name
            ))));
        }

        Ok(self.favorites.create_folder(user_id, name).await?)
    }

    /// The caller's folders, newest first
    pub async fn folders(&self, user_id: &UserId) -> Result<Vec<FavoriteFolder>, AppError> {
        Ok(self.favorites.find_folders(user_id).await?)
    }

    /// Delete a folder and everything in it; only its owner may
    pub async fn delete_folder(&self, id: &FolderId, caller: &UserId) -> Result<(), AppError> {
        self.owned_folder(id, caller).await?;
        self.favorites.delete_folder(id).await?;
        Ok(())
    }

    /// Save a vivac into one of the caller's folders
    pub async fn add_favorite(
        &self,
        folder_id: &FolderId,
        caller: &UserId,
        vivac_id: &VivacId,
    ) -> Result<UserFavorite, AppError> {
        self.owned_folder(folder_id, caller).await?;

        if self.vivacs.find_by_id(vivac_id).await?.is_none() {
            return Err(AppError::NotFound("Vivac point".to_string()));
        }
        if self
            .favorites
            .find_favorite_in_folder(folder_id, vivac_id)
            .await?
            .is_some()
        {
            return Err(AppError::Domain(DomainError::AlreadyExists(
                "Vivac already saved in this folder".to_string(),
            )));
        }

        Ok(self.favorites.create_favorite(folder_id, vivac_id).await?)
    }

    /// Folder contents with vivac data, newest first
    pub async fn folder_contents(
        &self,
        folder_id: &FolderId,
        caller: &UserId,
    ) -> Result<Vec<FavoriteWithVivac>, AppError> {
        self.owned_folder(folder_id, caller).await?;
        Ok(self.favorites.find_favorites(folder_id).await?)
    }

    /// Remove a favorite; only the folder owner may
    pub async fn remove_favorite(
        &self,
        id: &FavoriteId,
        caller: &UserId,
    ) -> Result<(), AppError> {
        let favorite = self
            .favorites
            .find_favorite(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Favorite".to_string()))?;
        self.owned_folder(&favorite.folder_id, caller).await?;

        self.favorites.delete_favorite(id).await?;
        Ok(())
    }

    /// Move a favorite into another folder owned by the same caller
    pub async fn move_favorite(
        &self,
        id: &FavoriteId,
        caller: &UserId,
        target_folder: &FolderId,
    ) -> Result<UserFavorite, AppError> {
        let favorite = self
            .favorites
            .find_favorite(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Favorite".to_string()))?;
        self.owned_folder(&favorite.folder_id, caller).await?;
        self.owned_folder(target_folder, caller).await?;

        if self
            .favorites
            .find_favorite_in_folder(target_folder, &favorite.vivac_id)
            .await?
            .is_some()
        {
            return Err(AppError::Domain(DomainError::AlreadyExists(
                "Vivac already saved in the target folder".to_string(),
            )));
        }

        Ok(self.favorites.move_favorite(id, target_folder).await?)
    }

    /// Load the folder and check the caller owns it
    async fn owned_folder(
        &self,
        id: &FolderId,
        caller: &UserId,
    ) -> Result<FavoriteFolder, AppError> {
        let folder = self
            .favorites
            .find_folder(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Folder".to_string()))?;
        if folder.user_id != *caller {
            return Err(AppError::Domain(DomainError::Forbidden(
                "Only the owner can use this folder".to_string(),
            )));
        }
        Ok(folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{User, VivacPoint};
    use crate::domain::ports::UserRepository;
    use crate::test_utils::fixtures;
    use crate::test_utils::mocks::{
        InMemoryFavoriteRepository, InMemoryUserRepository, InMemoryVivacRepository,
    };

    type TestFavoritesService = FavoritesService<InMemoryFavoriteRepository, InMemoryVivacRepository>;

    async fn setup() -> (TestFavoritesService, User, VivacPoint) {
        let vivacs = Arc::new(InMemoryVivacRepository::new());
        let favorites = Arc::new(InMemoryFavoriteRepository::new(vivacs.clone()));
        let users = InMemoryUserRepository::new();

        let user = users.create(&fixtures::new_user("laura")).await.unwrap();
        let vivac = vivacs
            .create(&fixtures::new_vivac("Font Roja", &user.id))
            .await
            .unwrap();

        let svc = FavoritesService::new(favorites, vivacs);
        (svc, user, vivac)
    }

    #[tokio::test]
    async fn folder_names_unique_per_user() {
        let (svc, user, _) = setup().await;

        svc.create_folder(&user.id, "Summer").await.unwrap();
        let dup = svc.create_folder(&user.id, "Summer").await;
        assert!(matches!(
            dup,
            Err(AppError::Domain(DomainError::AlreadyExists(_)))
        ));
    }

    #[tokio::test]
    async fn save_list_and_remove() {
        let (svc, user, vivac) = setup().await;

        let folder = svc.create_folder(&user.id, "Summer").await.unwrap();
        let favorite = svc
            .add_favorite(&folder.id, &user.id, &vivac.id)
            .await
            .unwrap();

        let contents = svc.folder_contents(&folder.id, &user.id).await.unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].vivac.name, "Font Roja");

        // Same vivac twice in one folder is refused
        assert!(svc
            .add_favorite(&folder.id, &user.id, &vivac.id)
            .await
            .is_err());

        svc.remove_favorite(&favorite.id, &user.id).await.unwrap();
        assert!(svc
            .folder_contents(&folder.id, &user.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn move_between_own_folders() {
        let (svc, user, vivac) = setup().await;

        let summer = svc.create_folder(&user.id, "Summer").await.unwrap();
        let winter = svc.create_folder(&user.id, "Winter").await.unwrap();
        let favorite = svc
            .add_favorite(&summer.id, &user.id, &vivac.id)
            .await
            .unwrap();

        let moved = svc
            .move_favorite(&favorite.id, &user.id, &winter.id)
            .await
            .unwrap();
        assert_eq!(moved.folder_id, winter.id);

        assert!(svc
            .folder_contents(&summer.id, &user.id)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            svc.folder_contents(&winter.id, &user.id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn strangers_cannot_touch_folders() {
        let (svc, user, vivac) = setup().await;
        let stranger = fixtures::user_id();

        let folder = svc.create_folder(&user.id, "Summer").await.unwrap();
        assert!(svc
            .add_favorite(&folder.id, &stranger, &vivac.id)
            .await
            .is_err());
        assert!(svc.delete_folder(&folder.id, &stranger).await.is_err());
    }
}
