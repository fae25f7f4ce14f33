//! VivacGo API Server
//!
//! Backend for a location-sharing app for vivac (wild camping) spots.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    CloudinaryClient, GoogleTokeninfoVerifier, PostgresAchievementRepository,
    PostgresFavoriteRepository, PostgresFollowRepository, PostgresPasswordResetRepository,
    PostgresRatingRepository, PostgresSessionRepository, PostgresUserRepository,
    PostgresVivacRepository, SmtpMailer, WeatherApiClient,
};
use app::{
    AchievementService, AuthService, FavoritesService, FollowService, RatingService, UserService,
    VivacService,
};
use auth::JwtKeys;
use config::Config;
use domain::ports::SessionRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<
        AuthService<
            PostgresUserRepository,
            PostgresSessionRepository,
            PostgresPasswordResetRepository,
            GoogleTokeninfoVerifier,
            SmtpMailer,
        >,
    >,
    pub user_service: Arc<
        UserService<
            PostgresUserRepository,
            PostgresVivacRepository,
            PostgresFollowRepository,
            PostgresAchievementRepository,
        >,
    >,
    pub vivac_service: Arc<
        VivacService<
            PostgresVivacRepository,
            PostgresUserRepository,
            PostgresAchievementRepository,
            CloudinaryClient,
        >,
    >,
    pub rating_service: Arc<
        RatingService<
            PostgresRatingRepository,
            PostgresVivacRepository,
            PostgresUserRepository,
            PostgresAchievementRepository,
        >,
    >,
    pub follow_service: Arc<
        FollowService<
            PostgresFollowRepository,
            PostgresUserRepository,
            PostgresAchievementRepository,
        >,
    >,
    pub favorites_service:
        Arc<FavoritesService<PostgresFavoriteRepository, PostgresVivacRepository>>,
    pub achievement_service:
        Arc<AchievementService<PostgresAchievementRepository, PostgresUserRepository>>,
    pub images: Arc<CloudinaryClient>,
    pub weather: Arc<WeatherApiClient>,
    pub jwt_keys: Arc<JwtKeys>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vivacgo_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting VivacGo API...");

    // Load configuration
    let config = Config::from_env();

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connected");

    // Create adapters
    let user_repo = Arc::new(PostgresUserRepository::new(db.clone()));
    let vivac_repo = Arc::new(PostgresVivacRepository::new(db.clone()));
    let rating_repo = Arc::new(PostgresRatingRepository::new(db.clone()));
    let follow_repo = Arc::new(PostgresFollowRepository::new(db.clone()));
    let favorite_repo = Arc::new(PostgresFavoriteRepository::new(db.clone()));
    let achievement_repo = Arc::new(PostgresAchievementRepository::new(db.clone()));
    let session_repo = Arc::new(PostgresSessionRepository::new(db.clone()));
    let reset_repo = Arc::new(PostgresPasswordResetRepository::new(db.clone()));

    let images = Arc::new(CloudinaryClient::new(
        config.cloudinary_cloud_name.clone(),
        config.cloudinary_api_key.clone(),
        config.cloudinary_api_secret.clone(),
    ));
    let weather = Arc::new(WeatherApiClient::new(config.weather_api_key.clone()));

    let mailer = Arc::new(
        SmtpMailer::new(
            &config.mail_host,
            config.mail_port,
            config.mail_user.clone(),
            config.mail_pass.clone(),
            &config.mail_from,
            config.app_base_url.clone(),
        )
        .expect("Failed to build SMTP transport"),
    );

    let google_verifier = config
        .google_client_id
        .clone()
        .map(|client_id| Arc::new(GoogleTokeninfoVerifier::new(client_id)));
    if google_verifier.is_none() {
        tracing::warn!("GOOGLE_CLIENT_ID not set, Google login disabled");
    }

    let jwt_keys = Arc::new(JwtKeys::new(
        &config.jwt_secret,
        config.access_token_ttl_secs,
    ));

    // Create application services
    let achievement_service = Arc::new(AchievementService::new(
        achievement_repo.clone(),
        user_repo.clone(),
    ));

    // Catalog seed is idempotent
    achievement_service
        .seed()
        .await
        .expect("Failed to seed achievement catalog");

    // Sweep sessions that expired while the service was down
    match session_repo.delete_expired(chrono::Utc::now()).await {
        Ok(0) => {}
        Ok(n) => tracing::info!(deleted = n, "purged expired sessions"),
        Err(e) => tracing::warn!(error = %e, "expired session sweep failed"),
    }

    let auth_service = Arc::new(AuthService::new(
        user_repo.clone(),
        session_repo.clone(),
        reset_repo.clone(),
        google_verifier,
        mailer.clone(),
        jwt_keys.clone(),
        config.refresh_token_ttl_days,
    ));

    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        vivac_repo.clone(),
        follow_repo.clone(),
        achievement_service.clone(),
    ));

    let vivac_service = Arc::new(VivacService::new(
        vivac_repo.clone(),
        user_repo.clone(),
        achievement_service.clone(),
        images.clone(),
    ));

    let rating_service = Arc::new(RatingService::new(
        rating_repo.clone(),
        vivac_repo.clone(),
        user_repo.clone(),
        achievement_service.clone(),
    ));

    let follow_service = Arc::new(FollowService::new(
        follow_repo.clone(),
        user_repo.clone(),
        achievement_service.clone(),
    ));

    let favorites_service = Arc::new(FavoritesService::new(
        favorite_repo.clone(),
        vivac_repo.clone(),
    ));

    // Create app state
    let state = AppState {
        auth_service,
        user_service,
        vivac_service,
        rating_service,
        follow_service,
        favorites_service,
        achievement_service,
        images,
        weather,
        jwt_keys,
    };

    // Rate limiting config: 2 req/sec sustained, burst of 5
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    // (SmartIpKeyExtractor requires X-Forwarded-For headers from reverse proxy)
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .expect("Failed to build governor config"),
    );

    // Rate-limited routes (registration, login, password reset)
    let rate_limited_routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/google", post(handlers::google_login))
        .route(
            "/auth/password-reset/request",
            post(handlers::request_password_reset),
        )
        .route(
            "/auth/password-reset/confirm",
            post(handlers::confirm_password_reset),
        )
        .layer(GovernorLayer {
            config: governor_config,
        });

    // Build router
    let app = Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Session endpoints (the refresh token itself is the credential)
        .route("/auth/refresh", post(handlers::refresh))
        .route("/auth/logout", post(handlers::logout))
        // Public reads
        .route("/vivacs", get(handlers::list_vivacs))
        .route("/vivacs/:id", get(handlers::get_vivac))
        .route("/vivacs/user/:user_id", get(handlers::list_vivacs_by_user))
        .route(
            "/ratings/vivac/:vivac_id",
            get(handlers::list_ratings_by_vivac),
        )
        .route("/ratings/user/:user_id", get(handlers::list_ratings_by_user))
        .route("/users/:id/followers", get(handlers::list_followers))
        .route("/users/:id/following", get(handlers::list_following))
        .route("/users/avatars", get(handlers::list_avatars))
        .route("/achievements", get(handlers::list_achievements))
        .route(
            "/achievements/users/:user_id",
            get(handlers::list_unlocked),
        )
        .route("/weather/current", get(handlers::get_current))
        .route("/weather/forecast", get(handlers::get_forecast))
        // Public profile personalizes when a token is present
        .route(
            "/users/:id",
            get(handlers::get_public_profile).layer(middleware::from_fn_with_state(
                state.clone(),
                auth::optional_auth_middleware,
            )),
        )
        // Merge rate-limited routes
        .merge(rate_limited_routes)
        // Protected routes
        .nest(
            "/",
            Router::new()
                // Own profile
                .route(
                    "/users/me",
                    get(handlers::get_me)
                        .patch(handlers::update_me)
                        .delete(handlers::delete_me),
                )
                .route("/users/me/ranking", get(handlers::get_ranking))
                .route("/users/me/avatar", post(handlers::select_avatar))
                // Follows
                .route(
                    "/users/:id/follow",
                    post(handlers::follow_user).delete(handlers::unfollow_user),
                )
                // Vivac management
                .route("/vivacs", post(handlers::create_vivac))
                .route(
                    "/vivacs/:id",
                    patch(handlers::update_vivac).delete(handlers::delete_vivac),
                )
                .route(
                    "/vivacs/:id/photos",
                    post(handlers::add_photo).delete(handlers::remove_photo),
                )
                // Ratings
                .route("/ratings", post(handlers::create_rating))
                .route(
                    "/ratings/:id",
                    patch(handlers::update_rating).delete(handlers::delete_rating),
                )
                // Favorites
                .route(
                    "/favorites/folders",
                    post(handlers::create_folder).get(handlers::list_folders),
                )
                .route(
                    "/favorites/folders/:folder_id",
                    get(handlers::folder_contents).delete(handlers::delete_folder),
                )
                .route(
                    "/favorites/folders/:folder_id/add/:vivac_id",
                    post(handlers::add_favorite),
                )
                .route(
                    "/favorites/:favorite_id",
                    delete(handlers::remove_favorite),
                )
                .route(
                    "/favorites/:favorite_id/move/:folder_id",
                    patch(handlers::move_favorite),
                )
                // Image upload
                .route("/images", post(handlers::upload_image))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::auth_middleware,
                )),
        )
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
