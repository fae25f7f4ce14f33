//! Rating service
//!
//! One rating per user per vivac. Every mutation recomputes the vivac's
//! denormalized average and review count, and keeps the author's
//! `reviews_written` counter and XP in step.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::app::achievement_service::AchievementService;
use crate::app::xp_config::XP_REVIEW_WRITTEN;
use crate::domain::entities::{
    validate_stars, CounterKind, FollowProfile, NewRating, Rating, RatingId, UserId, VivacId,
};
use crate::domain::ports::{
    AchievementRepository, RatingRepository, UserRepository, VivacRepository,
};
use crate::error::{AppError, DomainError};

/// A rating with its author's profile
#[derive(Debug, Clone, Serialize)]
pub struct RatingWithAuthor {
    #[serde(flatten)]
    pub rating: Rating,
    pub author: Option<FollowProfile>,
}

/// Short vivac summary attached to a user's ratings
#[derive(Debug, Clone, Serialize)]
pub struct VivacSummary {
    pub id: VivacId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub avg_rating: Option<f64>,
}

/// A rating with the vivac it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct RatingWithVivac {
    #[serde(flatten)]
    pub rating: Rating,
    pub vivac: Option<VivacSummary>,
}

/// Service for ratings
pub struct RatingService<RR, VR, UR, AR>
where
    RR: RatingRepository,
    VR: VivacRepository,
    UR: UserRepository,
    AR: AchievementRepository,
{
    ratings: Arc<RR>,
    vivacs: Arc<VR>,
    users: Arc<UR>,
    achievements: Arc<AchievementService<AR, UR>>,
}

impl<RR, VR, UR, AR> RatingService<RR, VR, UR, AR>
where
    RR: RatingRepository,
    VR: VivacRepository,
    UR: UserRepository,
    AR: AchievementRepository,
{
    pub fn new(
        ratings: Arc<RR>,
        vivacs: Arc<VR>,
        users: Arc<UR>,
        achievements: Arc<AchievementService<AR, UR>>,
    ) -> Self {
        Self {
            ratings,
            vivacs,
            users,
            achievements,
        }
    }

    /// Rate a vivac. Grants base XP and runs the review milestone check for
    /// the author.
    pub async fn create(
        &self,
        user_id: &UserId,
        vivac_id: &VivacId,
        stars: i32,
        comment: Option<String>,
    ) -> Result<Rating, AppError> {
        validate_stars(stars).map_err(AppError::BadRequest)?;

        if self.vivacs.find_by_id(vivac_id).await?.is_none() {
            return Err(AppError::NotFound("Vivac point".to_string()));
        }
        if self
            .ratings
            .find_by_user_and_vivac(user_id, vivac_id)
            .await?
            .is_some()
        {
            return Err(AppError::Domain(DomainError::AlreadyExists(
                "You already rated this vivac".to_string(),
            )));
        }

        let rating = self
            .ratings
            .create(&NewRating {
                rating: stars,
                comment,
                user_id: *user_id,
                vivac_point_id: *vivac_id,
            })
            .await?;

        self.recompute_stats(vivac_id).await?;

        let count = self
            .users
            .adjust_review_count(user_id, 1, XP_REVIEW_WRITTEN)
            .await?;
        self.achievements
            .check_unlocks(user_id, CounterKind::ReviewsWritten, count)
            .await?;

        tracing::info!(rating = %rating.id, vivac = %vivac_id, "rating created");
        Ok(rating)
    }

    /// Update stars/comment; only the author may
    pub async fn update(
        &self,
        id: &RatingId,
        caller: &UserId,
        stars: Option<i32>,
        comment: Option<String>,
    ) -> Result<Rating, AppError> {
        if let Some(stars) = stars {
            validate_stars(stars).map_err(AppError::BadRequest)?;
        }

        let existing = self.authored_by(id, caller).await?;
        let updated = self.ratings.update(id, stars, comment).await?;

        if stars.is_some() {
            self.recompute_stats(&existing.vivac_point_id).await?;
        }

        Ok(updated)
    }

    /// Delete a rating; only the author may. Takes back the base XP, but
    /// unlocked achievements stay unlocked.
    pub async fn delete(&self, id: &RatingId, caller: &UserId) -> Result<(), AppError> {
        let existing = self.authored_by(id, caller).await?;

        self.ratings.delete(id).await?;
        self.recompute_stats(&existing.vivac_point_id).await?;
        self.users
            .adjust_review_count(caller, -1, -XP_REVIEW_WRITTEN)
            .await?;

        tracing::info!(rating = %id, "rating deleted");
        Ok(())
    }

    /// Ratings of a vivac with author profiles, newest first
    pub async fn by_vivac(&self, vivac_id: &VivacId) -> Result<Vec<RatingWithAuthor>, AppError> {
        if self.vivacs.find_by_id(vivac_id).await?.is_none() {
            return Err(AppError::NotFound("Vivac point".to_string()));
        }

        let ratings = self.ratings.find_by_vivac(vivac_id).await?;

        let mut authors: HashMap<UserId, FollowProfile> = HashMap::new();
        for rating in &ratings {
            if !authors.contains_key(&rating.user_id) {
                if let Some(user) = self.users.find_by_id(&rating.user_id).await? {
                    authors.insert(
                        user.id,
                        FollowProfile {
                            id: user.id,
                            user_name: user.user_name,
                            avatar_url: user.avatar_url,
                        },
                    );
                }
            }
        }

        Ok(ratings
            .into_iter()
            .map(|r| {
                let author = authors.get(&r.user_id).cloned();
                RatingWithAuthor { rating: r, author }
            })
            .collect())
    }

    /// Ratings written by a user with vivac summaries, newest first
    pub async fn by_user(&self, user_id: &UserId) -> Result<Vec<RatingWithVivac>, AppError> {
        let ratings = self.ratings.find_by_user(user_id).await?;

        let mut vivacs: HashMap<VivacId, VivacSummary> = HashMap::new();
        for rating in &ratings {
            if !vivacs.contains_key(&rating.vivac_point_id) {
                if let Some(v) = self.vivacs.find_by_id(&rating.vivac_point_id).await? {
                    vivacs.insert(
                        v.id,
                        VivacSummary {
                            id: v.id,
                            name: v.name,
                            latitude: v.latitude,
                            longitude: v.longitude,
                            avg_rating: v.avg_rating,
                        },
                    );
                }
            }
        }

        Ok(ratings
            .into_iter()
            .map(|r| {
                let vivac = vivacs.get(&r.vivac_point_id).cloned();
                RatingWithVivac { rating: r, vivac }
            })
            .collect())
    }

    /// Recompute the vivac's average and review count from its ratings.
    /// Average is None when no ratings remain.
    async fn recompute_stats(&self, vivac_id: &VivacId) -> Result<(), AppError> {
        let ratings = self.ratings.find_by_vivac(vivac_id).await?;
        let count = ratings.len() as i32;
        let avg = if count == 0 {
            None
        } else {
            Some(ratings.iter().map(|r| r.rating as f64).sum::<f64>() / count as f64)
        };

        self.vivacs.set_rating_stats(vivac_id, avg, count).await?;
        Ok(())
    }

    /// Load the rating and check the caller wrote it
    async fn authored_by(&self, id: &RatingId, caller: &UserId) -> Result<Rating, AppError> {
        let rating = self
            .ratings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Rating".to_string()))?;
        if rating.user_id != *caller {
            return Err(AppError::Domain(DomainError::Forbidden(
                "Only the author can modify this rating".to_string(),
            )));
        }
        Ok(rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{User, VivacPoint};
    use crate::test_utils::fixtures;
    use crate::test_utils::mocks::{
        InMemoryAchievementRepository, InMemoryRatingRepository, InMemoryUserRepository, InMemoryVivacRepository,
    };

    type TestRatingService = RatingService<
        InMemoryRatingRepository,
        InMemoryVivacRepository,
        InMemoryUserRepository,
        InMemoryAchievementRepository,
    >;

    async fn setup() -> (
        TestRatingService,
        Arc<InMemoryUserRepository>,
        Arc<InMemoryVivacRepository>,
        User,
        VivacPoint,
    ) {
        let ratings = Arc::new(InMemoryRatingRepository::new());
        let vivacs = Arc::new(InMemoryVivacRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let achievement_svc = Arc::new(AchievementService::new(
            Arc::new(InMemoryAchievementRepository::new()),
            users.clone(),
        ));
        achievement_svc.seed().await.unwrap();

        let owner = users.create(&fixtures::new_user("owner")).await.unwrap();
        let vivac = vivacs
            .create(&fixtures::new_vivac("Font Roja", &owner.id))
            .await
            .unwrap();
        let reviewer = users.create(&fixtures::new_user("reviewer")).await.unwrap();

        let svc = RatingService::new(ratings, vivacs.clone(), users.clone(), achievement_svc);
        (svc, users, vivacs, reviewer, vivac)
    }

    #[tokio::test]
    async fn create_updates_average_and_author_counters() {
        let (svc, users, vivacs, reviewer, vivac) = setup().await;

        svc.create(&reviewer.id, &vivac.id, 4, Some("great spot".to_string()))
            .await
            .unwrap();

        let v = vivacs.find_by_id(&vivac.id).await.unwrap().unwrap();
        assert_eq!(v.review_count, 1);
        assert_eq!(v.avg_rating, Some(4.0));

        let u = users.find_by_id(&reviewer.id).await.unwrap().unwrap();
        assert_eq!(u.reviews_written, 1);
        // 5 base + 5 for "Primera Reseña"
        assert_eq!(u.xp_points, 10);
    }

    #[tokio::test]
    async fn rejects_double_rating_and_bad_stars() {
        let (svc, _, _, reviewer, vivac) = setup().await;

        assert!(svc.create(&reviewer.id, &vivac.id, 0, None).await.is_err());
        assert!(svc.create(&reviewer.id, &vivac.id, 6, None).await.is_err());

        svc.create(&reviewer.id, &vivac.id, 5, None).await.unwrap();
        let again = svc.create(&reviewer.id, &vivac.id, 3, None).await;
        assert!(matches!(
            again,
            Err(AppError::Domain(DomainError::AlreadyExists(_)))
        ));
    }

    #[tokio::test]
    async fn average_over_multiple_ratings() {
        let (svc, users, vivacs, reviewer, vivac) = setup().await;
        let second = users.create(&fixtures::new_user("second")).await.unwrap();

        svc.create(&reviewer.id, &vivac.id, 5, None).await.unwrap();
        svc.create(&second.id, &vivac.id, 2, None).await.unwrap();

        let v = vivacs.find_by_id(&vivac.id).await.unwrap().unwrap();
        assert_eq!(v.review_count, 2);
        assert_eq!(v.avg_rating, Some(3.5));
    }

    #[tokio::test]
    async fn delete_clears_average_when_last_rating_goes() {
        let (svc, users, vivacs, reviewer, vivac) = setup().await;

        let rating = svc.create(&reviewer.id, &vivac.id, 5, None).await.unwrap();
        svc.delete(&rating.id, &reviewer.id).await.unwrap();

        let v = vivacs.find_by_id(&vivac.id).await.unwrap().unwrap();
        assert_eq!(v.review_count, 0);
        assert_eq!(v.avg_rating, None);

        let u = users.find_by_id(&reviewer.id).await.unwrap().unwrap();
        assert_eq!(u.reviews_written, 0);
        // Base XP taken back, milestone XP stays
        assert_eq!(u.xp_points, 5);
    }

    #[tokio::test]
    async fn only_author_may_modify() {
        let (svc, users, _, reviewer, vivac) = setup().await;
        let stranger = users.create(&fixtures::new_user("stranger")).await.unwrap();

        let rating = svc.create(&reviewer.id, &vivac.id, 4, None).await.unwrap();
        let result = svc.update(&rating.id, &stranger.id, Some(1), None).await;
        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Forbidden(_)))
        ));
    }
}
