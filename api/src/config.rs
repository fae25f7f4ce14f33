use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Secret for signing HS256 access tokens
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub access_token_ttl_secs: i64,
    /// Refresh token (session) lifetime in days
    pub refresh_token_ttl_days: i64,
    /// Google OAuth client ID (audience for ID token verification)
    pub google_client_id: Option<String>,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub weather_api_key: String,
    pub mail_host: String,
    pub mail_port: u16,
    pub mail_user: String,
    pub mail_pass: String,
    pub mail_from: String,
    /// Base URL of the frontend (used in password reset links)
    pub app_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "dev-secret-not-for-production".to_string()),
            access_token_ttl_secs: env::var("ACCESS_TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(900),
            refresh_token_ttl_days: env::var("REFRESH_TOKEN_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok(),
            cloudinary_cloud_name: env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
            cloudinary_api_key: env::var("CLOUDINARY_API_KEY").unwrap_or_default(),
            cloudinary_api_secret: env::var("CLOUDINARY_API_SECRET").unwrap_or_default(),
            weather_api_key: env::var("WEATHER_API_KEY").unwrap_or_default(),
            mail_host: env::var("MAIL_HOST").unwrap_or_else(|_| "localhost".to_string()),
            mail_port: env::var("MAIL_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            mail_user: env::var("MAIL_USER").unwrap_or_default(),
            mail_pass: env::var("MAIL_PASS").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "VivacGo <no-reply@vivacgo.local>".to_string()),
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "https://vivacweb.com".to_string()),
        }
    }

    /// Check if Google login is configured
    pub fn google_login_enabled(&self) -> bool {
        self.google_client_id.is_some()
    }
}
