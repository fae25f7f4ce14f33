//! Weather proxy handlers
//!
//! Thin passthrough to the weather provider with coordinate validation and
//! the provider's free-plan day cap.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::domain::entities::validate_coordinates;
use crate::domain::ports::{CurrentWeather, Forecast, WeatherProvider};
use crate::error::AppError;
use crate::AppState;

const MAX_FORECAST_DAYS: u8 = 3;

/// Query parameters for current conditions
#[derive(Debug, Deserialize)]
pub struct CurrentQuery {
    pub lat: f64,
    pub lon: f64,
}

/// Query parameters for the forecast
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub lat: f64,
    pub lon: f64,
    pub days: Option<u8>,
}

/// GET /weather/current
pub async fn get_current(
    State(state): State<AppState>,
    Query(query): Query<CurrentQuery>,
) -> Result<Json<CurrentWeather>, AppError> {
    validate_coordinates(query.lat, query.lon).map_err(AppError::BadRequest)?;
    let weather = state.weather.current(query.lat, query.lon).await?;
    Ok(Json(weather))
}

/// GET /weather/forecast
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<Forecast>, AppError> {
    validate_coordinates(query.lat, query.lon).map_err(AppError::BadRequest)?;
    let days = query.days.unwrap_or(MAX_FORECAST_DAYS).clamp(1, MAX_FORECAST_DAYS);
    let forecast = state.weather.forecast(query.lat, query.lon, days).await?;
    Ok(Json(forecast))
}
