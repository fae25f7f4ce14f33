//! Bearer token authentication middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::domain::entities::UserId;
use crate::error::AppError;
use crate::AppState;

/// Authenticated user injected into request extensions
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: UserId,
}

/// Extract the bearer token from the Authorization header
fn extract_bearer(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Authentication middleware
///
/// Verifies the access token and injects the AuthUser into request
/// extensions. Routes that require authentication should use this
/// middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer(&request).ok_or(AppError::Unauthorized)?;

    let claims = state
        .jwt_keys
        .verify(token)
        .map_err(|_| AppError::Unauthorized)?;

    request.extensions_mut().insert(AuthUser {
        id: UserId(claims.sub),
    });

    Ok(next.run(request).await)
}

/// Optional authentication middleware
///
/// Like auth_middleware but doesn't fail if no token is provided. The
/// AuthUser is absent from extensions if not authenticated.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = extract_bearer(&request) {
        if let Ok(claims) = state.jwt_keys.verify(token) {
            request.extensions_mut().insert(AuthUser {
                id: UserId(claims.sub),
            });
        }
    }

    next.run(request).await
}
