//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Self-declared outdoor experience level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserExperience {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for UserExperience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserExperience::Beginner => write!(f, "BEGINNER"),
            UserExperience::Intermediate => write!(f, "INTERMEDIATE"),
            UserExperience::Advanced => write!(f, "ADVANCED"),
        }
    }
}

impl std::str::FromStr for UserExperience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BEGINNER" => Ok(UserExperience::Beginner),
            "INTERMEDIATE" => Ok(UserExperience::Intermediate),
            "ADVANCED" => Ok(UserExperience::Advanced),
            _ => Err(format!("Unknown experience level: {}", s)),
        }
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub user_name: String,
    pub email: String,
    pub google_id: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub avatar_url: Option<String>,
    pub description: Option<String>,
    pub user_experience: UserExperience,
    pub xp_points: i32,
    pub vivacs_created: i32,
    pub reviews_written: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check whether this account came through Google login
    pub fn is_google_account(&self) -> bool {
        self.google_id.is_some()
    }
}

/// Data needed to create a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub google_id: Option<String>,
}

/// Partial profile update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub user_name: Option<String>,
    pub description: Option<String>,
    pub user_experience: Option<UserExperience>,
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_display_roundtrip() {
        for exp in [
            UserExperience::Beginner,
            UserExperience::Intermediate,
            UserExperience::Advanced,
        ] {
            assert_eq!(exp.to_string().parse::<UserExperience>().unwrap(), exp);
        }
    }

    #[test]
    fn experience_from_str_case_insensitive() {
        assert_eq!(
            "beginner".parse::<UserExperience>().unwrap(),
            UserExperience::Beginner
        );
        assert!("expert".parse::<UserExperience>().is_err());
    }

    #[test]
    fn user_serialization_hides_password_hash() {
        let user = User {
            id: UserId::new(),
            user_name: "javi".to_string(),
            email: "javi@mail.com".to_string(),
            google_id: None,
            password_hash: Some("$2b$10$secret".to_string()),
            avatar_url: None,
            description: None,
            user_experience: UserExperience::Beginner,
            xp_points: 0,
            vivacs_created: 0,
            reviews_written: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn user_id_display() {
        let id = UserId(Uuid::nil());
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
    }
}
