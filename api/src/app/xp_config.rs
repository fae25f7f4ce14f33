//! XP configuration constants
//!
//! Defines the base XP granted per action and the milestone thresholds the
//! achievement engine checks against. Milestone XP comes from the seeded
//! achievement catalog; the values here must stay in sync with the seed in
//! `achievement_service`.

/// XP for creating a vivac point
pub const XP_VIVAC_CREATED: i32 = 10;

/// XP for writing a review
pub const XP_REVIEW_WRITTEN: i32 = 5;

/// XP for gaining a follower (granted to the followed user)
pub const XP_FOLLOWER_GAINED: i32 = 2;

/// Vivac-creation milestones and their achievement XP rewards
pub const VIVAC_THRESHOLDS: [(i32, i32); 7] = [
    (1, 5),
    (5, 20),
    (25, 100),
    (50, 125),
    (100, 250),
    (150, 250),
    (200, 250),
];

/// Review-writing milestones and their achievement XP rewards
pub const REVIEW_THRESHOLDS: [(i32, i32); 7] = [
    (1, 5),
    (10, 10),
    (25, 20),
    (50, 30),
    (100, 40),
    (250, 75),
    (500, 75),
];

/// Follower-count milestones and their achievement XP rewards
pub const FOLLOWER_THRESHOLDS: [(i32, i32); 7] = [
    (1, 5),
    (10, 10),
    (50, 25),
    (100, 35),
    (250, 75),
    (500, 100),
    (1000, 100),
];

/// XP reward for completing every profile field
pub const XP_PROFILE_COMPLETE: i32 = 100;

/// Achievement name for a vivac-creation milestone
pub fn vivac_achievement_name(threshold: i32) -> String {
    if threshold == 1 {
        "Primer Vivac".to_string()
    } else {
        format!("{} Vivacs", threshold)
    }
}

/// Achievement name for a review-writing milestone
pub fn review_achievement_name(threshold: i32) -> String {
    if threshold == 1 {
        "Primera Reseña".to_string()
    } else {
        format!("{} Reseñas", threshold)
    }
}

/// Achievement name for a follower-count milestone
pub fn follower_achievement_name(threshold: i32) -> String {
    if threshold == 1 {
        "Primer Seguidor".to_string()
    } else {
        format!("{} Seguidores", threshold)
    }
}

/// Achievement name for the completed-profile unlock
pub const PROFILE_COMPLETE_ACHIEVEMENT: &str = "Perfil Completo";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_xp_values() {
        assert_eq!(XP_VIVAC_CREATED, 10);
        assert_eq!(XP_REVIEW_WRITTEN, 5);
        assert_eq!(XP_FOLLOWER_GAINED, 2);
    }

    #[test]
    fn thresholds_are_strictly_increasing() {
        for table in [VIVAC_THRESHOLDS, REVIEW_THRESHOLDS, FOLLOWER_THRESHOLDS] {
            for pair in table.windows(2) {
                assert!(pair[0].0 < pair[1].0);
            }
        }
    }

    #[test]
    fn milestone_names() {
        assert_eq!(vivac_achievement_name(1), "Primer Vivac");
        assert_eq!(vivac_achievement_name(25), "25 Vivacs");
        assert_eq!(review_achievement_name(1), "Primera Reseña");
        assert_eq!(review_achievement_name(500), "500 Reseñas");
        assert_eq!(follower_achievement_name(1), "Primer Seguidor");
        assert_eq!(follower_achievement_name(1000), "1000 Seguidores");
    }
}
