//! Favorites domain entities: folders and the vivacs saved in them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{UserId, VivacId, VivacPoint};

/// Unique identifier for a favorite folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderId(pub Uuid);

impl FolderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FolderId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for FolderId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Unique identifier for a saved favorite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FavoriteId(pub Uuid);

impl FavoriteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FavoriteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for FavoriteId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// A user-owned folder of saved vivac points; names are unique per user
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteFolder {
    pub id: FolderId,
    pub name: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A vivac saved into a folder, unique per (folder, vivac)
#[derive(Debug, Clone, Serialize)]
pub struct UserFavorite {
    pub id: FavoriteId,
    pub folder_id: FolderId,
    pub vivac_id: VivacId,
    pub created_at: DateTime<Utc>,
}

/// A favorite joined with its vivac for folder listings
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteWithVivac {
    pub id: FavoriteId,
    pub folder_id: FolderId,
    pub created_at: DateTime<Utc>,
    pub vivac: VivacPoint,
}
