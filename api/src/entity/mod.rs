//! SeaORM entity models
//!
//! Database models mirroring the Postgres schema. Kept separate from the
//! domain entities in `domain::entities`; the Postgres adapters convert
//! between the two.

pub mod achievements;
pub mod favorite_folders;
pub mod password_reset_tokens;
pub mod ratings;
pub mod user_achievements;
pub mod user_favorites;
pub mod user_follows;
pub mod user_sessions;
pub mod users;
pub mod vivac_points;
