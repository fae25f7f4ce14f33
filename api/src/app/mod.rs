//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod achievement_service;
pub mod auth_service;
pub mod favorites_service;
pub mod follow_service;
pub mod rating_service;
pub mod user_service;
pub mod vivac_service;
pub mod xp_config;

pub use achievement_service::AchievementService;
pub use auth_service::{
    generate_token, validate_email, validate_password, AuthService, ClientInfo, TokenPair,
};
pub use favorites_service::FavoritesService;
pub use follow_service::FollowService;
pub use rating_service::{RatingService, RatingWithAuthor, RatingWithVivac, VivacSummary};
pub use user_service::{AvatarPreset, PublicProfile, Ranking, RankingEntry, UserService};
pub use vivac_service::VivacService;
// Re-export XP config for public API (constants used by consumers)
#[allow(unused_imports)]
pub use xp_config::*;
