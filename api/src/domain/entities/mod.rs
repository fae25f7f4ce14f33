//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod achievement;
pub mod favorite;
pub mod follow;
pub mod rating;
pub mod session;
pub mod user;
pub mod vivac;

pub use achievement::{
    Achievement, AchievementId, CounterKind, NewAchievement, UnlockedAchievement, UserAchievement,
};
pub use favorite::{FavoriteFolder, FavoriteId, FavoriteWithVivac, FolderId, UserFavorite};
pub use follow::{FollowEntry, FollowId, FollowProfile, UserFollow};
pub use rating::{validate_stars, NewRating, Rating, RatingId};
pub use session::{NewSession, PasswordResetToken, Session};
pub use user::{NewUser, UpdateUser, User, UserExperience, UserId};
pub use vivac::{
    haversine_km, validate_coordinates, AccessDifficulty, BoundingBox, Environment, GeoFilter,
    NewVivac, Privacity, TerrainType, UpdateVivac, VivacFilter, VivacId, VivacPoint,
};
