//! WeatherAPI adapter

mod client;

pub use client::WeatherApiClient;
