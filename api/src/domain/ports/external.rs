//! External service ports
//!
//! Trait definitions for the third-party services the application talks to:
//! the image CDN, the weather provider, the SMTP mailer, and Google ID token
//! verification.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{CloudinaryError, GoogleAuthError, MailError, WeatherError};

/// An image stored in the CDN
#[derive(Debug, Clone, Serialize)]
pub struct StoredImage {
    pub url: String,
    pub public_id: String,
}

/// Image CDN port (Cloudinary)
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Upload raw image bytes; returns the public URL and CDN public id
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<StoredImage, CloudinaryError>;

    /// Delete an image by its CDN public id
    async fn delete(&self, public_id: &str) -> Result<(), CloudinaryError>;

    /// Extract the CDN public id from a delivery URL
    fn public_id_from_url(&self, url: &str) -> Result<String, CloudinaryError>;
}

/// Flattened current conditions at a coordinate
#[derive(Debug, Clone, Serialize)]
pub struct CurrentWeather {
    pub location: String,
    pub region: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub condition: String,
    pub icon: String,
    pub wind_kph: f64,
    pub humidity: i32,
    pub precip_mm: f64,
    pub cloud: i32,
    pub uv: f64,
    pub last_updated: String,
}

/// One hour of a forecast day
#[derive(Debug, Clone, Serialize)]
pub struct ForecastHour {
    pub time: String,
    pub temp: f64,
    pub feels_like: f64,
    pub condition: String,
    pub icon: String,
    pub wind_kph: f64,
    pub humidity: i32,
    pub precip_mm: f64,
    pub chance_of_rain: i32,
    pub cloud: i32,
}

/// Daily forecast summary with hourly breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ForecastDay {
    pub date: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub avg_temp: f64,
    pub condition: String,
    pub icon: String,
    pub max_wind: f64,
    pub total_precip: f64,
    pub uv: f64,
    pub hours: Vec<ForecastHour>,
}

/// Multi-day forecast for a coordinate
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub location: String,
    pub region: String,
    pub country: String,
    pub forecast: Vec<ForecastDay>,
}

/// Weather provider port (WeatherAPI)
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions at a coordinate
    async fn current(&self, lat: f64, lon: f64) -> Result<CurrentWeather, WeatherError>;

    /// Forecast for up to `days` days (provider caps apply)
    async fn forecast(&self, lat: f64, lon: f64, days: u8) -> Result<Forecast, WeatherError>;
}

/// Outbound mail port (SMTP)
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the password-reset mail with the reset link for `token`
    async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), MailError>;
}

/// Identity claims extracted from a verified Google ID token
#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    /// Google account id (`sub` claim)
    pub google_id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Google ID token verification port
#[async_trait]
pub trait GoogleTokenVerifier: Send + Sync {
    /// Verify an ID token and return the identity claims.
    /// Fails when the token is invalid or its audience does not match the
    /// configured client id.
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, GoogleAuthError>;
}
