//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod external;
pub mod repositories;

pub use external::{
    CurrentWeather, Forecast, ForecastDay, ForecastHour, GoogleIdentity, GoogleTokenVerifier,
    ImageStore, Mailer, StoredImage, WeatherProvider,
};
pub use repositories::{
    AchievementRepository, FavoriteRepository, FollowRepository, PasswordResetRepository,
    RatingRepository, SessionRepository, UserRepository, VivacRepository,
};
