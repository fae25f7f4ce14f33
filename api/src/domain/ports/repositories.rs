//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{
    Achievement, AchievementId, FavoriteFolder, FavoriteId, FavoriteWithVivac, FollowEntry,
    FolderId, NewAchievement, NewRating, NewSession, NewUser, NewVivac, PasswordResetToken,
    Rating, RatingId, Session, UnlockedAchievement, UpdateUser, UpdateVivac, User,
    UserAchievement, UserFavorite, UserFollow, UserId, VivacFilter, VivacId, VivacPoint,
};
use crate::error::DomainError;

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by email (lowercased)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by Google account id
    async fn find_by_google_id(&self, google_id: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Apply a partial profile update
    async fn update(&self, id: &UserId, update: &UpdateUser) -> Result<User, DomainError>;

    /// Replace the password hash
    async fn set_password_hash(&self, id: &UserId, hash: &str) -> Result<(), DomainError>;

    /// Link a Google account id to an existing user
    async fn set_google_id(&self, id: &UserId, google_id: &str) -> Result<(), DomainError>;

    /// Delete a user
    async fn delete(&self, id: &UserId) -> Result<(), DomainError>;

    /// Adjust the vivacs-created counter and XP by the given deltas.
    /// Both are floored at zero. Returns the new counter value.
    async fn adjust_vivac_count(
        &self,
        id: &UserId,
        count_delta: i32,
        xp_delta: i32,
    ) -> Result<i32, DomainError>;

    /// Adjust the reviews-written counter and XP by the given deltas.
    /// Both are floored at zero. Returns the new counter value.
    async fn adjust_review_count(
        &self,
        id: &UserId,
        count_delta: i32,
        xp_delta: i32,
    ) -> Result<i32, DomainError>;

    /// Add XP (may be negative; floored at zero)
    async fn adjust_xp(&self, id: &UserId, delta: i32) -> Result<(), DomainError>;

    /// Count users with strictly more XP than the given amount
    async fn count_with_more_xp(&self, xp: i32) -> Result<i64, DomainError>;

    /// Top users by XP
    async fn find_top_by_xp(&self, limit: u64) -> Result<Vec<User>, DomainError>;
}

/// Repository for VivacPoint entities
#[async_trait]
pub trait VivacRepository: Send + Sync {
    /// Find a vivac by ID
    async fn find_by_id(&self, id: &VivacId) -> Result<Option<VivacPoint>, DomainError>;

    /// List vivacs matching the filters, newest first. The geo filter's
    /// bounding box is applied here; the Haversine refinement happens in the
    /// service.
    async fn find_filtered(&self, filter: &VivacFilter) -> Result<Vec<VivacPoint>, DomainError>;

    /// Vivacs created by a user, newest first
    async fn find_by_creator(&self, user_id: &UserId) -> Result<Vec<VivacPoint>, DomainError>;

    /// Count vivacs created by a user
    async fn count_by_creator(&self, user_id: &UserId) -> Result<i64, DomainError>;

    /// Create a new vivac
    async fn create(&self, vivac: &NewVivac) -> Result<VivacPoint, DomainError>;

    /// Apply a partial update
    async fn update(&self, id: &VivacId, update: &UpdateVivac) -> Result<VivacPoint, DomainError>;

    /// Replace the photo URL list
    async fn set_photo_urls(&self, id: &VivacId, urls: &[String]) -> Result<(), DomainError>;

    /// Update the denormalized rating stats
    async fn set_rating_stats(
        &self,
        id: &VivacId,
        avg_rating: Option<f64>,
        review_count: i32,
    ) -> Result<(), DomainError>;

    /// Delete a vivac
    async fn delete(&self, id: &VivacId) -> Result<(), DomainError>;
}

/// Repository for Rating entities
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Find a rating by ID
    async fn find_by_id(&self, id: &RatingId) -> Result<Option<Rating>, DomainError>;

    /// Find a user's rating of a vivac
    async fn find_by_user_and_vivac(
        &self,
        user_id: &UserId,
        vivac_id: &VivacId,
    ) -> Result<Option<Rating>, DomainError>;

    /// Ratings of a vivac, newest first
    async fn find_by_vivac(&self, vivac_id: &VivacId) -> Result<Vec<Rating>, DomainError>;

    /// Ratings written by a user, newest first
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Rating>, DomainError>;

    /// Create a new rating
    async fn create(&self, rating: &NewRating) -> Result<Rating, DomainError>;

    /// Update stars/comment
    async fn update(
        &self,
        id: &RatingId,
        stars: Option<i32>,
        comment: Option<String>,
    ) -> Result<Rating, DomainError>;

    /// Delete a rating
    async fn delete(&self, id: &RatingId) -> Result<(), DomainError>;
}

/// Repository for the follow graph
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Find the edge between two users
    async fn find_edge(
        &self,
        follower_id: &UserId,
        followed_id: &UserId,
    ) -> Result<Option<UserFollow>, DomainError>;

    /// Create a follow edge
    async fn create(
        &self,
        follower_id: &UserId,
        followed_id: &UserId,
    ) -> Result<UserFollow, DomainError>;

    /// Remove a follow edge
    async fn delete(&self, follower_id: &UserId, followed_id: &UserId)
        -> Result<(), DomainError>;

    /// Followers of a user with their profiles, newest first
    async fn find_followers(&self, user_id: &UserId) -> Result<Vec<FollowEntry>, DomainError>;

    /// Users a user follows with their profiles, newest first
    async fn find_following(&self, user_id: &UserId) -> Result<Vec<FollowEntry>, DomainError>;

    /// Count followers of a user
    async fn count_followers(&self, user_id: &UserId) -> Result<i64, DomainError>;

    /// Count users a user follows
    async fn count_following(&self, user_id: &UserId) -> Result<i64, DomainError>;
}

/// Repository for favorite folders and their contents
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Find a folder by ID
    async fn find_folder(&self, id: &FolderId) -> Result<Option<FavoriteFolder>, DomainError>;

    /// Find a user's folder by name
    async fn find_folder_by_name(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<Option<FavoriteFolder>, DomainError>;

    /// A user's folders, newest first
    async fn find_folders(&self, user_id: &UserId) -> Result<Vec<FavoriteFolder>, DomainError>;

    /// Create a folder
    async fn create_folder(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<FavoriteFolder, DomainError>;

    /// Delete a folder and its favorites
    async fn delete_folder(&self, id: &FolderId) -> Result<(), DomainError>;

    /// Find a favorite by ID
    async fn find_favorite(&self, id: &FavoriteId) -> Result<Option<UserFavorite>, DomainError>;

    /// Find a favorite by folder and vivac
    async fn find_favorite_in_folder(
        &self,
        folder_id: &FolderId,
        vivac_id: &VivacId,
    ) -> Result<Option<UserFavorite>, DomainError>;

    /// Favorites in a folder joined with their vivacs, newest first
    async fn find_favorites(
        &self,
        folder_id: &FolderId,
    ) -> Result<Vec<FavoriteWithVivac>, DomainError>;

    /// Save a vivac into a folder
    async fn create_favorite(
        &self,
        folder_id: &FolderId,
        vivac_id: &VivacId,
    ) -> Result<UserFavorite, DomainError>;

    /// Remove a favorite
    async fn delete_favorite(&self, id: &FavoriteId) -> Result<(), DomainError>;

    /// Move a favorite to another folder
    async fn move_favorite(
        &self,
        id: &FavoriteId,
        folder_id: &FolderId,
    ) -> Result<UserFavorite, DomainError>;
}

/// Repository for the achievement catalog and unlocks
#[async_trait]
pub trait AchievementRepository: Send + Sync {
    /// Find an achievement by name
    async fn find_by_name(&self, name: &str) -> Result<Option<Achievement>, DomainError>;

    /// The full catalog, oldest first
    async fn find_all(&self) -> Result<Vec<Achievement>, DomainError>;

    /// Create an achievement (seeding)
    async fn create(&self, achievement: &NewAchievement) -> Result<Achievement, DomainError>;

    /// Check whether a user has unlocked an achievement
    async fn is_unlocked(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<bool, DomainError>;

    /// Record an unlock; must be idempotent under the (user, achievement)
    /// unique constraint
    async fn unlock(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<UserAchievement, DomainError>;

    /// A user's unlocks joined with achievement data, oldest unlock first
    async fn find_unlocked(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UnlockedAchievement>, DomainError>;
}

/// Repository for refresh-token sessions
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create a session
    async fn create(&self, session: &NewSession) -> Result<Session, DomainError>;

    /// Find a session by its refresh token
    async fn find_by_token(&self, refresh_token: &str) -> Result<Option<Session>, DomainError>;

    /// Mark the session holding this token as revoked
    async fn revoke_by_token(&self, refresh_token: &str) -> Result<(), DomainError>;

    /// Revoke every session of a user (password change, forced logout)
    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<(), DomainError>;

    /// Delete sessions that expired before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, DomainError>;
}

/// Repository for password-reset tokens
#[async_trait]
pub trait PasswordResetRepository: Send + Sync {
    /// Create a reset token
    async fn create(
        &self,
        user_id: &UserId,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken, DomainError>;

    /// Find an unused token
    async fn find_unused(&self, token: &str) -> Result<Option<PasswordResetToken>, DomainError>;

    /// Mark a token as used
    async fn mark_used(&self, id: &uuid::Uuid) -> Result<(), DomainError>;
}
