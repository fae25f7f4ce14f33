//! Unified error types for the VivacGo API
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors
//! - `CloudinaryError` / `WeatherError` / `MailError` / `GoogleAuthError`:
//!   external client errors
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Domain layer errors - pure business logic errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Entity already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Cloudinary image CDN client errors
#[derive(Debug, Error)]
pub enum CloudinaryError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized - invalid credentials")]
    Unauthorized,

    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// WeatherAPI client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// SMTP mailer errors
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// Google ID token verification errors
#[derive(Debug, Error)]
pub enum GoogleAuthError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid ID token")]
    InvalidToken,

    #[error("Token audience mismatch")]
    AudienceMismatch,

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Cloudinary error: {0}")]
    Cloudinary(#[from] CloudinaryError),

    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Google auth error: {0}")]
    GoogleAuth(#[from] GoogleAuthError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body for JSON responses
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Domain(DomainError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(msg.clone()))
            }
            AppError::Domain(DomainError::AlreadyExists(msg)) => {
                (StatusCode::CONFLICT, "Already exists", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                "Validation error",
                Some(msg.clone()),
            ),
            AppError::Domain(DomainError::Unauthorized(msg)) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Forbidden(msg)) => {
                (StatusCode::FORBIDDEN, "Forbidden", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "Conflict", Some(msg.clone()))
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
            AppError::Cloudinary(e) => {
                tracing::error!("Cloudinary error: {}", e);
                match e {
                    CloudinaryError::InvalidUrl(msg) => (
                        StatusCode::BAD_REQUEST,
                        "Invalid image URL",
                        Some(msg.clone()),
                    ),
                    CloudinaryError::Api { status, message } => {
                        let http_status = if *status == 404 {
                            StatusCode::NOT_FOUND
                        } else {
                            StatusCode::BAD_GATEWAY
                        };
                        (http_status, "Image service error", Some(message.clone()))
                    }
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Image service error",
                        None,
                    ),
                }
            }
            AppError::Weather(e) => {
                tracing::error!("Weather error: {}", e);
                match e {
                    WeatherError::RateLimited => {
                        (StatusCode::TOO_MANY_REQUESTS, "Rate limited", None)
                    }
                    _ => (StatusCode::BAD_GATEWAY, "Weather service error", None),
                }
            }
            AppError::Mail(e) => {
                tracing::error!("Mail error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Mail service error",
                    None,
                )
            }
            AppError::GoogleAuth(e) => {
                tracing::warn!("Google auth error: {}", e);
                match e {
                    GoogleAuthError::InvalidToken | GoogleAuthError::AudienceMismatch => {
                        (StatusCode::UNAUTHORIZED, "Invalid Google token", None)
                    }
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "Google auth error", None),
                }
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "Bad request", Some(msg.clone()))
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", Some(msg.clone())),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
