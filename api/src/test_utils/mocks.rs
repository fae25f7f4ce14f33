//! Mock implementations of port traits
//!
//! In-memory repositories and configurable external-client mocks. They store
//! data behind `RwLock`ed maps and let tests verify behavior without a
//! database or network.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::domain::entities::{
    Achievement, AchievementId, FavoriteFolder, FavoriteId, FavoriteWithVivac, FollowEntry,
    FollowId, FollowProfile, FolderId, NewAchievement, NewRating, NewSession, NewUser, NewVivac,
    PasswordResetToken, Rating, RatingId, Session, UnlockedAchievement, UpdateUser, UpdateVivac,
    User, UserAchievement, UserExperience, UserFavorite, UserFollow, UserId, VivacFilter, VivacId,
    VivacPoint,
};
use crate::domain::ports::{
    AchievementRepository, CurrentWeather, FavoriteRepository, FollowRepository, Forecast,
    ForecastDay, GoogleIdentity, GoogleTokenVerifier, ImageStore, Mailer,
    PasswordResetRepository, RatingRepository, SessionRepository, StoredImage, UserRepository,
    VivacRepository, WeatherProvider,
};
use crate::error::{CloudinaryError, DomainError, GoogleAuthError, MailError, WeatherError};

// ============================================================================
// In-Memory User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn mutate<F>(&self, id: &UserId, f: F) -> Result<User, DomainError>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("User {}", id)))?;
        f(user);
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = email.trim().to_lowercase();
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.user_name == user_name.trim())
            .cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn create(&self, new: &NewUser) -> Result<User, DomainError> {
        let user = User {
            id: UserId(Uuid::new_v4()),
            user_name: new.user_name.trim().to_string(),
            email: new.email.trim().to_lowercase(),
            google_id: new.google_id.clone(),
            password_hash: new.password_hash.clone(),
            avatar_url: None,
            description: None,
            user_experience: UserExperience::Beginner,
            xp_points: 0,
            vivacs_created: 0,
            reviews_written: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.users.write().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: &UserId, update: &UpdateUser) -> Result<User, DomainError> {
        self.mutate(id, |user| {
            if let Some(ref name) = update.user_name {
                user.user_name = name.trim().to_string();
            }
            if let Some(ref description) = update.description {
                user.description = Some(description.clone());
            }
            if let Some(experience) = update.user_experience {
                user.user_experience = experience;
            }
            if let Some(ref avatar_url) = update.avatar_url {
                user.avatar_url = Some(avatar_url.clone());
            }
        })
    }

    async fn set_password_hash(&self, id: &UserId, hash: &str) -> Result<(), DomainError> {
        self.mutate(id, |user| user.password_hash = Some(hash.to_string()))?;
        Ok(())
    }

    async fn set_google_id(&self, id: &UserId, google_id: &str) -> Result<(), DomainError> {
        self.mutate(id, |user| user.google_id = Some(google_id.to_string()))?;
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        self.users.write().unwrap().remove(id);
        Ok(())
    }

    async fn adjust_vivac_count(
        &self,
        id: &UserId,
        count_delta: i32,
        xp_delta: i32,
    ) -> Result<i32, DomainError> {
        let user = self.mutate(id, |user| {
            user.vivacs_created = (user.vivacs_created + count_delta).max(0);
            user.xp_points = (user.xp_points + xp_delta).max(0);
        })?;
        Ok(user.vivacs_created)
    }

    async fn adjust_review_count(
        &self,
        id: &UserId,
        count_delta: i32,
        xp_delta: i32,
    ) -> Result<i32, DomainError> {
        let user = self.mutate(id, |user| {
            user.reviews_written = (user.reviews_written + count_delta).max(0);
            user.xp_points = (user.xp_points + xp_delta).max(0);
        })?;
        Ok(user.reviews_written)
    }

    async fn adjust_xp(&self, id: &UserId, delta: i32) -> Result<(), DomainError> {
        self.mutate(id, |user| {
            user.xp_points = (user.xp_points + delta).max(0);
        })?;
        Ok(())
    }

    async fn count_with_more_xp(&self, xp: i32) -> Result<i64, DomainError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .filter(|u| u.xp_points > xp)
            .count() as i64)
    }

    async fn find_top_by_xp(&self, limit: u64) -> Result<Vec<User>, DomainError> {
        let mut all: Vec<User> = self.users.read().unwrap().values().cloned().collect();
        all.sort_by(|a, b| b.xp_points.cmp(&a.xp_points));
        all.truncate(limit as usize);
        Ok(all)
    }
}

// ============================================================================
// In-Memory Vivac Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryVivacRepository {
    vivacs: Arc<RwLock<HashMap<VivacId, VivacPoint>>>,
}

impl InMemoryVivacRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn mutate<F>(&self, id: &VivacId, f: F) -> Result<VivacPoint, DomainError>
    where
        F: FnOnce(&mut VivacPoint),
    {
        let mut vivacs = self.vivacs.write().unwrap();
        let vivac = vivacs
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Vivac {}", id)))?;
        f(vivac);
        vivac.updated_at = Utc::now();
        Ok(vivac.clone())
    }
}

#[async_trait]
impl VivacRepository for InMemoryVivacRepository {
    async fn find_by_id(&self, id: &VivacId) -> Result<Option<VivacPoint>, DomainError> {
        Ok(self.vivacs.read().unwrap().get(id).cloned())
    }

    async fn find_filtered(&self, filter: &VivacFilter) -> Result<Vec<VivacPoint>, DomainError> {
        let bbox = filter.geo.as_ref().map(|g| g.bounding_box());
        let mut result: Vec<VivacPoint> = self
            .vivacs
            .read()
            .unwrap()
            .values()
            .filter(|v| {
                filter
                    .privacity
                    .map_or(true, |p| v.privacity == Some(p))
                    && filter
                        .access_difficulty
                        .map_or(true, |d| v.access_difficulty == d)
                    && filter
                        .min_elevation
                        .map_or(true, |min| v.elevation.map_or(false, |e| e >= min))
                    && filter
                        .max_elevation
                        .map_or(true, |max| v.elevation.map_or(false, |e| e <= max))
                    && bbox.as_ref().map_or(true, |b| {
                        v.latitude >= b.min_lat
                            && v.latitude <= b.max_lat
                            && v.longitude >= b.min_lon
                            && v.longitude <= b.max_lon
                    })
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn find_by_creator(&self, user_id: &UserId) -> Result<Vec<VivacPoint>, DomainError> {
        let mut result: Vec<VivacPoint> = self
            .vivacs
            .read()
            .unwrap()
            .values()
            .filter(|v| v.created_by == *user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn count_by_creator(&self, user_id: &UserId) -> Result<i64, DomainError> {
        Ok(self
            .vivacs
            .read()
            .unwrap()
            .values()
            .filter(|v| v.created_by == *user_id)
            .count() as i64)
    }

    async fn create(&self, new: &NewVivac) -> Result<VivacPoint, DomainError> {
        let vivac = VivacPoint {
            id: VivacId(Uuid::new_v4()),
            name: new.name.trim().to_string(),
            description: new.description.clone(),
            latitude: new.latitude,
            longitude: new.longitude,
            elevation: new.elevation,
            access_difficulty: new.access_difficulty,
            environment: new.environment,
            privacity: new.privacity,
            terrain_type: new.terrain_type,
            photo_urls: new.photo_urls.clone(),
            pet_friendly: new.pet_friendly,
            avg_rating: None,
            review_count: 0,
            created_by: new.created_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.vivacs.write().unwrap().insert(vivac.id, vivac.clone());
        Ok(vivac)
    }

    async fn update(&self, id: &VivacId, update: &UpdateVivac) -> Result<VivacPoint, DomainError> {
        self.mutate(id, |vivac| {
            if let Some(ref name) = update.name {
                vivac.name = name.trim().to_string();
            }
            if let Some(ref description) = update.description {
                vivac.description = Some(description.clone());
            }
            if let Some(elevation) = update.elevation {
                vivac.elevation = Some(elevation);
            }
            if let Some(difficulty) = update.access_difficulty {
                vivac.access_difficulty = difficulty;
            }
            if let Some(environment) = update.environment {
                vivac.environment = Some(environment);
            }
            if let Some(privacity) = update.privacity {
                vivac.privacity = Some(privacity);
            }
            if let Some(terrain) = update.terrain_type {
                vivac.terrain_type = Some(terrain);
            }
            if let Some(pet_friendly) = update.pet_friendly {
                vivac.pet_friendly = pet_friendly;
            }
        })
    }

    async fn set_photo_urls(&self, id: &VivacId, urls: &[String]) -> Result<(), DomainError> {
        self.mutate(id, |vivac| vivac.photo_urls = urls.to_vec())?;
        Ok(())
    }

    async fn set_rating_stats(
        &self,
        id: &VivacId,
        avg_rating: Option<f64>,
        review_count: i32,
    ) -> Result<(), DomainError> {
        self.mutate(id, |vivac| {
            vivac.avg_rating = avg_rating;
            vivac.review_count = review_count;
        })?;
        Ok(())
    }

    async fn delete(&self, id: &VivacId) -> Result<(), DomainError> {
        self.vivacs.write().unwrap().remove(id);
        Ok(())
    }
}

// ============================================================================
// In-Memory Rating Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryRatingRepository {
    ratings: Arc<RwLock<HashMap<RatingId, Rating>>>,
}

impl InMemoryRatingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    async fn find_by_id(&self, id: &RatingId) -> Result<Option<Rating>, DomainError> {
        Ok(self.ratings.read().unwrap().get(id).cloned())
    }

    async fn find_by_user_and_vivac(
        &self,
        user_id: &UserId,
        vivac_id: &VivacId,
    ) -> Result<Option<Rating>, DomainError> {
        Ok(self
            .ratings
            .read()
            .unwrap()
            .values()
            .find(|r| r.user_id == *user_id && r.vivac_point_id == *vivac_id)
            .cloned())
    }

    async fn find_by_vivac(&self, vivac_id: &VivacId) -> Result<Vec<Rating>, DomainError> {
        let mut result: Vec<Rating> = self
            .ratings
            .read()
            .unwrap()
            .values()
            .filter(|r| r.vivac_point_id == *vivac_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Rating>, DomainError> {
        let mut result: Vec<Rating> = self
            .ratings
            .read()
            .unwrap()
            .values()
            .filter(|r| r.user_id == *user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn create(&self, new: &NewRating) -> Result<Rating, DomainError> {
        let rating = Rating {
            id: RatingId(Uuid::new_v4()),
            rating: new.rating,
            comment: new.comment.clone(),
            user_id: new.user_id,
            vivac_point_id: new.vivac_point_id,
            created_at: Utc::now(),
        };
        self.ratings
            .write()
            .unwrap()
            .insert(rating.id, rating.clone());
        Ok(rating)
    }

    async fn update(
        &self,
        id: &RatingId,
        stars: Option<i32>,
        comment: Option<String>,
    ) -> Result<Rating, DomainError> {
        let mut ratings = self.ratings.write().unwrap();
        let rating = ratings
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Rating {}", id)))?;
        if let Some(stars) = stars {
            rating.rating = stars;
        }
        if let Some(comment) = comment {
            rating.comment = Some(comment);
        }
        Ok(rating.clone())
    }

    async fn delete(&self, id: &RatingId) -> Result<(), DomainError> {
        self.ratings.write().unwrap().remove(id);
        Ok(())
    }
}

// ============================================================================
// In-Memory Follow Repository
// ============================================================================

/// Holds the user repository so listings can resolve profiles, like the SQL
/// adapter joins against the users table.
pub struct InMemoryFollowRepository {
    edges: Arc<RwLock<Vec<UserFollow>>>,
    users: Arc<InMemoryUserRepository>,
}

impl InMemoryFollowRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            edges: Arc::new(RwLock::new(Vec::new())),
            users,
        }
    }

    fn profile(&self, id: &UserId) -> Option<FollowProfile> {
        self.users
            .users
            .read()
            .unwrap()
            .get(id)
            .map(|u| FollowProfile {
                id: u.id,
                user_name: u.user_name.clone(),
                avatar_url: u.avatar_url.clone(),
            })
    }
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn find_edge(
        &self,
        follower_id: &UserId,
        followed_id: &UserId,
    ) -> Result<Option<UserFollow>, DomainError> {
        Ok(self
            .edges
            .read()
            .unwrap()
            .iter()
            .find(|e| e.follower_id == *follower_id && e.followed_id == *followed_id)
            .cloned())
    }

    async fn create(
        &self,
        follower_id: &UserId,
        followed_id: &UserId,
    ) -> Result<UserFollow, DomainError> {
        let edge = UserFollow {
            id: FollowId(Uuid::new_v4()),
            follower_id: *follower_id,
            followed_id: *followed_id,
            created_at: Utc::now(),
        };
        self.edges.write().unwrap().push(edge.clone());
        Ok(edge)
    }

    async fn delete(
        &self,
        follower_id: &UserId,
        followed_id: &UserId,
    ) -> Result<(), DomainError> {
        self.edges
            .write()
            .unwrap()
            .retain(|e| !(e.follower_id == *follower_id && e.followed_id == *followed_id));
        Ok(())
    }

    async fn find_followers(&self, user_id: &UserId) -> Result<Vec<FollowEntry>, DomainError> {
        let mut edges: Vec<UserFollow> = self
            .edges
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.followed_id == *user_id)
            .cloned()
            .collect();
        edges.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(edges
            .into_iter()
            .filter_map(|e| {
                Some(FollowEntry {
                    id: e.id,
                    created_at: e.created_at,
                    user: self.profile(&e.follower_id)?,
                })
            })
            .collect())
    }

    async fn find_following(&self, user_id: &UserId) -> Result<Vec<FollowEntry>, DomainError> {
        let mut edges: Vec<UserFollow> = self
            .edges
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.follower_id == *user_id)
            .cloned()
            .collect();
        edges.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(edges
            .into_iter()
            .filter_map(|e| {
                Some(FollowEntry {
                    id: e.id,
                    created_at: e.created_at,
                    user: self.profile(&e.followed_id)?,
                })
            })
            .collect())
    }

    async fn count_followers(&self, user_id: &UserId) -> Result<i64, DomainError> {
        Ok(self
            .edges
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.followed_id == *user_id)
            .count() as i64)
    }

    async fn count_following(&self, user_id: &UserId) -> Result<i64, DomainError> {
        Ok(self
            .edges
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.follower_id == *user_id)
            .count() as i64)
    }
}

// ============================================================================
// In-Memory Favorite Repository
// ============================================================================

/// Holds the vivac repository so folder listings can attach vivac data.
pub struct InMemoryFavoriteRepository {
    folders: Arc<RwLock<HashMap<FolderId, FavoriteFolder>>>,
    favorites: Arc<RwLock<HashMap<FavoriteId, UserFavorite>>>,
    vivacs: Arc<InMemoryVivacRepository>,
}

impl InMemoryFavoriteRepository {
    pub fn new(vivacs: Arc<InMemoryVivacRepository>) -> Self {
        Self {
            folders: Arc::new(RwLock::new(HashMap::new())),
            favorites: Arc::new(RwLock::new(HashMap::new())),
            vivacs,
        }
    }
}

#[async_trait]
impl FavoriteRepository for InMemoryFavoriteRepository {
    async fn find_folder(&self, id: &FolderId) -> Result<Option<FavoriteFolder>, DomainError> {
        Ok(self.folders.read().unwrap().get(id).cloned())
    }

    async fn find_folder_by_name(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<Option<FavoriteFolder>, DomainError> {
        Ok(self
            .folders
            .read()
            .unwrap()
            .values()
            .find(|f| f.user_id == *user_id && f.name == name.trim())
            .cloned())
    }

    async fn find_folders(&self, user_id: &UserId) -> Result<Vec<FavoriteFolder>, DomainError> {
        let mut result: Vec<FavoriteFolder> = self
            .folders
            .read()
            .unwrap()
            .values()
            .filter(|f| f.user_id == *user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn create_folder(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<FavoriteFolder, DomainError> {
        let folder = FavoriteFolder {
            id: FolderId(Uuid::new_v4()),
            name: name.trim().to_string(),
            user_id: *user_id,
            created_at: Utc::now(),
        };
        self.folders
            .write()
            .unwrap()
            .insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn delete_folder(&self, id: &FolderId) -> Result<(), DomainError> {
        self.favorites
            .write()
            .unwrap()
            .retain(|_, f| f.folder_id != *id);
        self.folders.write().unwrap().remove(id);
        Ok(())
    }

    async fn find_favorite(&self, id: &FavoriteId) -> Result<Option<UserFavorite>, DomainError> {
        Ok(self.favorites.read().unwrap().get(id).cloned())
    }

    async fn find_favorite_in_folder(
        &self,
        folder_id: &FolderId,
        vivac_id: &VivacId,
    ) -> Result<Option<UserFavorite>, DomainError> {
        Ok(self
            .favorites
            .read()
            .unwrap()
            .values()
            .find(|f| f.folder_id == *folder_id && f.vivac_id == *vivac_id)
            .cloned())
    }

    async fn find_favorites(
        &self,
        folder_id: &FolderId,
    ) -> Result<Vec<FavoriteWithVivac>, DomainError> {
        let mut favorites: Vec<UserFavorite> = self
            .favorites
            .read()
            .unwrap()
            .values()
            .filter(|f| f.folder_id == *folder_id)
            .cloned()
            .collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let vivacs = self.vivacs.vivacs.read().unwrap();
        Ok(favorites
            .into_iter()
            .filter_map(|f| {
                Some(FavoriteWithVivac {
                    id: f.id,
                    folder_id: f.folder_id,
                    created_at: f.created_at,
                    vivac: vivacs.get(&f.vivac_id)?.clone(),
                })
            })
            .collect())
    }

    async fn create_favorite(
        &self,
        folder_id: &FolderId,
        vivac_id: &VivacId,
    ) -> Result<UserFavorite, DomainError> {
        let favorite = UserFavorite {
            id: FavoriteId(Uuid::new_v4()),
            folder_id: *folder_id,
            vivac_id: *vivac_id,
            created_at: Utc::now(),
        };
        self.favorites
            .write()
            .unwrap()
            .insert(favorite.id, favorite.clone());
        Ok(favorite)
    }

    async fn delete_favorite(&self, id: &FavoriteId) -> Result<(), DomainError> {
        self.favorites.write().unwrap().remove(id);
        Ok(())
    }

    async fn move_favorite(
        &self,
        id: &FavoriteId,
        folder_id: &FolderId,
    ) -> Result<UserFavorite, DomainError> {
        let mut favorites = self.favorites.write().unwrap();
        let favorite = favorites
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Favorite {}", id.0)))?;
        favorite.folder_id = *folder_id;
        Ok(favorite.clone())
    }
}

// ============================================================================
// In-Memory Achievement Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryAchievementRepository {
    achievements: Arc<RwLock<Vec<Achievement>>>,
    unlocks: Arc<RwLock<Vec<UserAchievement>>>,
}

impl InMemoryAchievementRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AchievementRepository for InMemoryAchievementRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Achievement>, DomainError> {
        Ok(self
            .achievements
            .read()
            .unwrap()
            .iter()
            .find(|a| a.name == name)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Achievement>, DomainError> {
        Ok(self.achievements.read().unwrap().clone())
    }

    async fn create(&self, new: &NewAchievement) -> Result<Achievement, DomainError> {
        let achievement = Achievement {
            id: AchievementId(Uuid::new_v4()),
            name: new.name.clone(),
            description: new.description.clone(),
            icon_url: new.icon_url.clone(),
            xp_reward: new.xp_reward,
            created_at: Utc::now(),
        };
        self.achievements
            .write()
            .unwrap()
            .push(achievement.clone());
        Ok(achievement)
    }

    async fn is_unlocked(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<bool, DomainError> {
        Ok(self
            .unlocks
            .read()
            .unwrap()
            .iter()
            .any(|u| u.user_id == *user_id && u.achievement_id == *achievement_id))
    }

    async fn unlock(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<UserAchievement, DomainError> {
        let mut unlocks = self.unlocks.write().unwrap();
        if let Some(existing) = unlocks
            .iter()
            .find(|u| u.user_id == *user_id && u.achievement_id == *achievement_id)
        {
            return Ok(existing.clone());
        }
        let unlock = UserAchievement {
            id: Uuid::new_v4(),
            user_id: *user_id,
            achievement_id: *achievement_id,
            unlocked_at: Utc::now(),
        };
        unlocks.push(unlock.clone());
        Ok(unlock)
    }

    async fn find_unlocked(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UnlockedAchievement>, DomainError> {
        let achievements = self.achievements.read().unwrap();
        Ok(self
            .unlocks
            .read()
            .unwrap()
            .iter()
            .filter(|u| u.user_id == *user_id)
            .filter_map(|u| {
                let achievement = achievements
                    .iter()
                    .find(|a| a.id == u.achievement_id)?
                    .clone();
                Some(UnlockedAchievement {
                    achievement,
                    unlocked_at: u.unlocked_at,
                })
            })
            .collect())
    }
}

// ============================================================================
// In-Memory Session / Password Reset Repositories
// ============================================================================

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, new: &NewSession) -> Result<Session, DomainError> {
        let session = Session {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            refresh_token: new.refresh_token.clone(),
            expires_at: new.expires_at,
            ip_address: new.ip_address.clone(),
            user_agent: new.user_agent.clone(),
            created_at: Utc::now(),
            last_used_at: Utc::now(),
            revoked: false,
        };
        self.sessions
            .write()
            .unwrap()
            .insert(session.refresh_token.clone(), session.clone());
        Ok(session)
    }

    async fn find_by_token(&self, refresh_token: &str) -> Result<Option<Session>, DomainError> {
        Ok(self.sessions.read().unwrap().get(refresh_token).cloned())
    }

    async fn revoke_by_token(&self, refresh_token: &str) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().unwrap();
        let session = sessions
            .get_mut(refresh_token)
            .ok_or_else(|| DomainError::NotFound("Session".to_string()))?;
        session.revoked = true;
        session.last_used_at = Utc::now();
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<(), DomainError> {
        for session in self.sessions.write().unwrap().values_mut() {
            if session.user_id == *user_id {
                session.revoked = true;
            }
        }
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at >= now);
        Ok((before - sessions.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryPasswordResetRepository {
    tokens: Arc<RwLock<HashMap<String, PasswordResetToken>>>,
}

impl InMemoryPasswordResetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PasswordResetRepository for InMemoryPasswordResetRepository {
    async fn create(
        &self,
        user_id: &UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken, DomainError> {
        let reset = PasswordResetToken {
            id: Uuid::new_v4(),
            user_id: *user_id,
            token: token.to_string(),
            created_at: Utc::now(),
            expires_at,
            used: false,
        };
        self.tokens
            .write()
            .unwrap()
            .insert(reset.token.clone(), reset.clone());
        Ok(reset)
    }

    async fn find_unused(&self, token: &str) -> Result<Option<PasswordResetToken>, DomainError> {
        Ok(self
            .tokens
            .read()
            .unwrap()
            .get(token)
            .filter(|t| !t.used)
            .cloned())
    }

    async fn mark_used(&self, id: &Uuid) -> Result<(), DomainError> {
        for token in self.tokens.write().unwrap().values_mut() {
            if token.id == *id {
                token.used = true;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Mock external clients
// ============================================================================

/// Image store that fabricates delivery URLs and records deletions
#[derive(Default)]
pub struct MockImageStore {
    counter: AtomicU32,
    pub deleted: Arc<RwLock<Vec<String>>>,
}

impl MockImageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageStore for MockImageStore {
    async fn upload(
        &self,
        _bytes: Vec<u8>,
        _file_name: &str,
    ) -> Result<StoredImage, CloudinaryError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(StoredImage {
            url: format!(
                "https://res.cloudinary.com/test/image/upload/v1/vivac/img{}.jpg",
                n
            ),
            public_id: format!("vivac/img{}", n),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), CloudinaryError> {
        self.deleted.write().unwrap().push(public_id.to_string());
        Ok(())
    }

    fn public_id_from_url(&self, url: &str) -> Result<String, CloudinaryError> {
        let start = url
            .find("/vivac/")
            .ok_or_else(|| CloudinaryError::InvalidUrl(url.to_string()))?;
        let rest = &url[start + "/vivac/".len()..];
        let name = rest.split('.').next().unwrap_or(rest);
        Ok(format!("vivac/{}", name))
    }
}

/// Weather provider with canned responses
#[derive(Default)]
pub struct MockWeatherProvider;

#[async_trait]
impl WeatherProvider for MockWeatherProvider {
    async fn current(&self, _lat: f64, _lon: f64) -> Result<CurrentWeather, WeatherError> {
        Ok(CurrentWeather {
            location: "Alcoy".to_string(),
            region: "Valencia".to_string(),
            country: "Spain".to_string(),
            temperature: 21.0,
            feels_like: 20.5,
            condition: "Sunny".to_string(),
            icon: "//cdn/sun.png".to_string(),
            wind_kph: 8.0,
            humidity: 50,
            precip_mm: 0.0,
            cloud: 5,
            uv: 5.0,
            last_updated: "2025-06-01 12:00".to_string(),
        })
    }

    async fn forecast(&self, _lat: f64, _lon: f64, days: u8) -> Result<Forecast, WeatherError> {
        let day = ForecastDay {
            date: "2025-06-02".to_string(),
            max_temp: 26.0,
            min_temp: 12.0,
            avg_temp: 19.0,
            condition: "Partly cloudy".to_string(),
            icon: "//cdn/pc.png".to_string(),
            max_wind: 15.0,
            total_precip: 0.0,
            uv: 6.0,
            hours: Vec::new(),
        };
        Ok(Forecast {
            location: "Alcoy".to_string(),
            region: "Valencia".to_string(),
            country: "Spain".to_string(),
            forecast: vec![day; days as usize],
        })
    }
}

/// Mailer that records outgoing mail instead of sending it
#[derive(Default)]
pub struct MockMailer {
    pub sent: Arc<RwLock<Vec<(String, String)>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// (recipient, token) pairs recorded so far
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.read().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), MailError> {
        self.sent
            .write()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

/// Token verifier backed by a fixed token → identity table
#[derive(Default)]
pub struct MockGoogleVerifier {
    identities: Arc<RwLock<HashMap<String, GoogleIdentity>>>,
}

impl MockGoogleVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(self, token: &str, identity: GoogleIdentity) -> Self {
        self.identities
            .write()
            .unwrap()
            .insert(token.to_string(), identity);
        self
    }
}

#[async_trait]
impl GoogleTokenVerifier for MockGoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, GoogleAuthError> {
        self.identities
            .read()
            .unwrap()
            .get(id_token)
            .cloned()
            .ok_or(GoogleAuthError::InvalidToken)
    }
}
