//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use uuid::Uuid;

use crate::domain::entities::{AccessDifficulty, NewUser, NewVivac, UserId};

/// A fresh random user id
pub fn user_id() -> UserId {
    UserId(Uuid::new_v4())
}

/// Registration data for a user named `name` (password already hashed)
pub fn new_user(name: &str) -> NewUser {
    NewUser {
        user_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        password_hash: Some("$2b$10$fixturehashfixturehashfixtureha".to_string()),
        google_id: None,
    }
}

/// Creation data for a vivac near Alcoy with easy access
pub fn new_vivac(name: &str, created_by: &UserId) -> NewVivac {
    NewVivac {
        name: name.to_string(),
        description: Some("Sheltered spot with a spring nearby".to_string()),
        latitude: 38.698,
        longitude: -0.473,
        elevation: Some(1050),
        access_difficulty: AccessDifficulty::Easy,
        environment: None,
        privacity: None,
        terrain_type: None,
        photo_urls: Vec::new(),
        pet_friendly: true,
        created_by: *created_by,
    }
}
