//! PostgreSQL persistence adapters

mod achievement_repo;
mod favorite_repo;
mod follow_repo;
mod rating_repo;
mod session_repo;
mod user_repo;
mod vivac_repo;

pub use achievement_repo::PostgresAchievementRepository;
pub use favorite_repo::PostgresFavoriteRepository;
pub use follow_repo::PostgresFollowRepository;
pub use rating_repo::PostgresRatingRepository;
pub use session_repo::{PostgresPasswordResetRepository, PostgresSessionRepository};
pub use user_repo::PostgresUserRepository;
pub use vivac_repo::PostgresVivacRepository;
