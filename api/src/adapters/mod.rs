//! Adapters implementing the domain ports
//!
//! Persistence goes through PostgreSQL (SeaORM); the external adapters wrap
//! Cloudinary, WeatherAPI, SMTP, and Google token verification.

pub mod cloudinary;
pub mod google;
pub mod postgres;
pub mod smtp;
pub mod weatherapi;

pub use cloudinary::CloudinaryClient;
pub use google::GoogleTokeninfoVerifier;
pub use postgres::{
    PostgresAchievementRepository, PostgresFavoriteRepository, PostgresFollowRepository,
    PostgresPasswordResetRepository, PostgresRatingRepository, PostgresSessionRepository,
    PostgresUserRepository, PostgresVivacRepository,
};
pub use smtp::SmtpMailer;
pub use weatherapi::WeatherApiClient;
