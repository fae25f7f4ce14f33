//! User service
//!
//! Profiles, the XP leaderboard, account deletion, and the preset avatar
//! catalog.

use std::sync::Arc;

use serde::Serialize;

use crate::app::achievement_service::AchievementService;
use crate::app::xp_config::PROFILE_COMPLETE_ACHIEVEMENT;
use crate::domain::entities::{UpdateUser, User, UserExperience, UserId};
use crate::domain::ports::{
    AchievementRepository, FollowRepository, UserRepository, VivacRepository,
};
use crate::error::{AppError, DomainError};

/// Preset avatar file names served by the frontend CDN
const AVATARS: [&str; 8] = [
    "bear.png",
    "deer.png",
    "eagle.png",
    "fox.png",
    "ibex.png",
    "owl.png",
    "wolf.png",
    "boar.png",
];

/// One entry of the preset avatar catalog
#[derive(Debug, Clone, Serialize)]
pub struct AvatarPreset {
    pub name: String,
    pub url: String,
}

/// Public view of a profile with social counts
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub id: UserId,
    pub user_name: String,
    pub avatar_url: Option<String>,
    pub description: Option<String>,
    pub user_experience: UserExperience,
    pub xp_points: i32,
    pub vivacs_created: i32,
    pub reviews_written: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub followers: i64,
    pub following: i64,
    /// Whether the authenticated caller follows this user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

/// One row of the leaderboard
#[derive(Debug, Clone, Serialize)]
pub struct RankingEntry {
    pub id: UserId,
    pub user_name: String,
    pub avatar_url: Option<String>,
    pub user_experience: UserExperience,
    pub xp_points: i32,
    pub vivacs_created: i32,
    pub reviews_written: i32,
}

/// Leaderboard position of the caller plus the top 100
#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    pub position: i64,
    pub user_xp: i32,
    pub top100: Vec<RankingEntry>,
}

/// Service for user profiles
pub struct UserService<UR, VR, FR, AR>
where
    UR: UserRepository,
    VR: VivacRepository,
    FR: FollowRepository,
    AR: AchievementRepository,
{
    users: Arc<UR>,
    vivacs: Arc<VR>,
    follows: Arc<FR>,
    achievements: Arc<AchievementService<AR, UR>>,
}

impl<UR, VR, FR, AR> UserService<UR, VR, FR, AR>
where
    UR: UserRepository,
    VR: VivacRepository,
    FR: FollowRepository,
    AR: AchievementRepository,
{
    pub fn new(
        users: Arc<UR>,
        vivacs: Arc<VR>,
        follows: Arc<FR>,
        achievements: Arc<AchievementService<AR, UR>>,
    ) -> Self {
        Self {
            users,
            vivacs,
            follows,
            achievements,
        }
    }

    /// Own profile
    pub async fn me(&self, id: &UserId) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    /// Update the caller's profile. A freshly completed profile (both
    /// description and avatar set) unlocks its achievement.
    pub async fn update_profile(
        &self,
        id: &UserId,
        update: UpdateUser,
    ) -> Result<User, AppError> {
        if let Some(ref name) = update.user_name {
            let name = name.trim();
            if name.is_empty() || name.len() > 50 {
                return Err(AppError::BadRequest(
                    "Username must be between 1 and 50 characters".to_string(),
                ));
            }
            if let Some(existing) = self.users.find_by_user_name(name).await? {
                if existing.id != *id {
                    return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                        "Username '{}' is taken",
                        name
                    ))));
                }
            }
        }

        let user = self.users.update(id, &update).await?;

        if user.description.is_some() && user.avatar_url.is_some() {
            self.achievements
                .unlock_by_name(id, PROFILE_COMPLETE_ACHIEVEMENT)
                .await?;
        }

        // Unlock may have changed XP
        self.me(id).await
    }

    /// Delete the caller's account. Refused while they still own vivac
    /// points, so spots never go orphaned silently.
    pub async fn delete_account(&self, id: &UserId) -> Result<(), AppError> {
        let owned = self.vivacs.count_by_creator(id).await?;
        if owned > 0 {
            return Err(AppError::BadRequest(
                "Account has vivac points; delete them first".to_string(),
            ));
        }

        self.users.delete(id).await?;
        tracing::info!(user = %id, "account deleted");
        Ok(())
    }

    /// Public profile with social counts. `viewer` personalizes
    /// `is_following` when present.
    pub async fn public_profile(
        &self,
        id: &UserId,
        viewer: Option<&UserId>,
    ) -> Result<PublicProfile, AppError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let followers = self.follows.count_followers(id).await?;
        let following = self.follows.count_following(id).await?;

        let is_following = match viewer {
            Some(viewer) if viewer != id => {
                Some(self.follows.find_edge(viewer, id).await?.is_some())
            }
            _ => None,
        };

        Ok(PublicProfile {
            id: user.id,
            user_name: user.user_name,
            avatar_url: user.avatar_url,
            description: user.description,
            user_experience: user.user_experience,
            xp_points: user.xp_points,
            vivacs_created: user.vivacs_created,
            reviews_written: user.reviews_written,
            created_at: user.created_at,
            followers,
            following,
            is_following,
        })
    }

    /// The caller's leaderboard position (1 + users with strictly more XP)
    /// and the top 100 by XP.
    pub async fn ranking(&self, id: &UserId) -> Result<Ranking, AppError> {
        let user = self.me(id).await?;

        let above = self.users.count_with_more_xp(user.xp_points).await?;
        let top = self.users.find_top_by_xp(100).await?;

        Ok(Ranking {
            position: above + 1,
            user_xp: user.xp_points,
            top100: top
                .into_iter()
                .map(|u| RankingEntry {
                    id: u.id,
                    user_name: u.user_name,
                    avatar_url: u.avatar_url,
                    user_experience: u.user_experience,
                    xp_points: u.xp_points,
                    vivacs_created: u.vivacs_created,
                    reviews_written: u.reviews_written,
                })
                .collect(),
        })
    }

    /// The preset avatar catalog
    pub fn avatars(&self) -> Vec<AvatarPreset> {
        AVATARS
            .iter()
            .map(|name| AvatarPreset {
                name: name.to_string(),
                url: format!("/uploads/avatars/{}", name),
            })
            .collect()
    }

    /// Select a preset avatar by name
    pub async fn select_avatar(&self, id: &UserId, avatar: &str) -> Result<User, AppError> {
        if !AVATARS.contains(&avatar) {
            return Err(AppError::BadRequest(format!(
                "Unknown avatar '{}'",
                avatar
            )));
        }

        let update = UpdateUser {
            avatar_url: Some(format!("/uploads/avatars/{}", avatar)),
            ..Default::default()
        };
        self.update_profile(id, update).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;
    use crate::test_utils::mocks::{
        InMemoryAchievementRepository, InMemoryFollowRepository, InMemoryUserRepository, InMemoryVivacRepository,
    };

    type TestUserService = UserService<
        InMemoryUserRepository,
        InMemoryVivacRepository,
        InMemoryFollowRepository,
        InMemoryAchievementRepository,
    >;

    async fn setup() -> (TestUserService, Arc<InMemoryUserRepository>, User) {
        let users = Arc::new(InMemoryUserRepository::new());
        let vivacs = Arc::new(InMemoryVivacRepository::new());
        let follows = Arc::new(InMemoryFollowRepository::new(users.clone()));
        let achievement_svc = Arc::new(AchievementService::new(
            Arc::new(InMemoryAchievementRepository::new()),
            users.clone(),
        ));
        achievement_svc.seed().await.unwrap();

        let user = users.create(&fixtures::new_user("maria")).await.unwrap();
        let svc = UserService::new(users.clone(), vivacs, follows, achievement_svc);
        (svc, users, user)
    }

    #[tokio::test]
    async fn rejects_taken_username() {
        let (svc, users, user) = setup().await;
        users.create(&fixtures::new_user("other")).await.unwrap();

        let result = svc
            .update_profile(
                &user.id,
                UpdateUser {
                    user_name: Some("other".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::AlreadyExists(_)))
        ));
    }

    #[tokio::test]
    async fn keeping_own_username_is_fine() {
        let (svc, _, user) = setup().await;

        let updated = svc
            .update_profile(
                &user.id,
                UpdateUser {
                    user_name: Some("maria".to_string()),
                    description: Some("hiking the Aitana ridge".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.description.as_deref(), Some("hiking the Aitana ridge"));
    }

    #[tokio::test]
    async fn completed_profile_unlocks_achievement_once() {
        let (svc, _, user) = setup().await;

        let updated = svc
            .update_profile(
                &user.id,
                UpdateUser {
                    description: Some("vivac hunter".to_string()),
                    avatar_url: Some("/uploads/avatars/fox.png".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.xp_points, 100);

        // Updating again does not re-grant the XP
        let again = svc
            .update_profile(
                &user.id,
                UpdateUser {
                    description: Some("still a vivac hunter".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(again.xp_points, 100);
    }

    #[tokio::test]
    async fn select_avatar_validates_name() {
        let (svc, _, user) = setup().await;

        assert!(svc.select_avatar(&user.id, "dragon.png").await.is_err());

        let updated = svc.select_avatar(&user.id, "fox.png").await.unwrap();
        assert_eq!(
            updated.avatar_url.as_deref(),
            Some("/uploads/avatars/fox.png")
        );
    }

    #[tokio::test]
    async fn ranking_position_counts_users_above() {
        let (svc, users, user) = setup().await;
        let rival = users.create(&fixtures::new_user("rival")).await.unwrap();
        users.adjust_xp(&rival.id, 500).await.unwrap();

        let ranking = svc.ranking(&user.id).await.unwrap();
        assert_eq!(ranking.position, 2);
        assert_eq!(ranking.top100[0].user_name, "rival");
    }
}
