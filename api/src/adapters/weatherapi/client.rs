//! WeatherAPI.com client
//!
//! Proxies current conditions and forecasts for a coordinate, flattening the
//! provider's nested response into the wire shapes the handlers serve.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::ports::{
    CurrentWeather, Forecast, ForecastDay, ForecastHour, WeatherProvider,
};
use crate::error::WeatherError;

const BASE_URL: &str = "https://api.weatherapi.com/v1";

/// WeatherAPI REST client
pub struct WeatherApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
    region: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    feelslike_c: f64,
    condition: ApiCondition,
    wind_kph: f64,
    humidity: i32,
    precip_mm: f64,
    cloud: i32,
    uv: f64,
    last_updated: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: ApiLocation,
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiDaySummary {
    maxtemp_c: f64,
    mintemp_c: f64,
    avgtemp_c: f64,
    maxwind_kph: f64,
    totalprecip_mm: f64,
    uv: f64,
    condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
struct ApiHour {
    time: String,
    temp_c: f64,
    feelslike_c: f64,
    condition: ApiCondition,
    wind_kph: f64,
    humidity: i32,
    precip_mm: f64,
    chance_of_rain: i32,
    cloud: i32,
}

#[derive(Debug, Deserialize)]
struct ApiForecastDay {
    date: String,
    day: ApiDaySummary,
    hour: Vec<ApiHour>,
}

#[derive(Debug, Deserialize)]
struct ApiForecast {
    forecastday: Vec<ApiForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    location: ApiLocation,
    forecast: ApiForecast,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url,
        }
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, WeatherError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, path))
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status.as_u16() == 429 {
            return Err(WeatherError::RateLimited);
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .map(|b| b.error.message)
            .unwrap_or_else(|_| status.to_string());

        Err(WeatherError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiClient {
    async fn current(&self, lat: f64, lon: f64) -> Result<CurrentWeather, WeatherError> {
        let body: CurrentResponse = self
            .get("current.json", &[("q", format!("{},{}", lat, lon))])
            .await?
            .json()
            .await
            .map_err(|e| WeatherError::Deserialization(e.to_string()))?;

        Ok(CurrentWeather {
            location: body.location.name,
            region: body.location.region,
            country: body.location.country,
            temperature: body.current.temp_c,
            feels_like: body.current.feelslike_c,
            condition: body.current.condition.text,
            icon: body.current.condition.icon,
            wind_kph: body.current.wind_kph,
            humidity: body.current.humidity,
            precip_mm: body.current.precip_mm,
            cloud: body.current.cloud,
            uv: body.current.uv,
            last_updated: body.current.last_updated,
        })
    }

    async fn forecast(&self, lat: f64, lon: f64, days: u8) -> Result<Forecast, WeatherError> {
        let body: ForecastResponse = self
            .get(
                "forecast.json",
                &[
                    ("q", format!("{},{}", lat, lon)),
                    ("days", days.to_string()),
                ],
            )
            .await?
            .json()
            .await
            .map_err(|e| WeatherError::Deserialization(e.to_string()))?;

        let forecast = body
            .forecast
            .forecastday
            .into_iter()
            .map(|d| ForecastDay {
                date: d.date,
                max_temp: d.day.maxtemp_c,
                min_temp: d.day.mintemp_c,
                avg_temp: d.day.avgtemp_c,
                condition: d.day.condition.text,
                icon: d.day.condition.icon,
                max_wind: d.day.maxwind_kph,
                total_precip: d.day.totalprecip_mm,
                uv: d.day.uv,
                hours: d
                    .hour
                    .into_iter()
                    .map(|h| ForecastHour {
                        time: h.time,
                        temp: h.temp_c,
                        feels_like: h.feelslike_c,
                        condition: h.condition.text,
                        icon: h.condition.icon,
                        wind_kph: h.wind_kph,
                        humidity: h.humidity,
                        precip_mm: h.precip_mm,
                        chance_of_rain: h.chance_of_rain,
                        cloud: h.cloud,
                    })
                    .collect(),
            })
            .collect();

        Ok(Forecast {
            location: body.location.name,
            region: body.location.region,
            country: body.location.country,
            forecast,
        })
    }
}
