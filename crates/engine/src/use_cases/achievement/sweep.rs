//! Periodic achievement unlock sweep.
//!
//! Compares every leaderboard total against every achievement threshold and
//! grants the unlock once per (user, achievement) pair. Quadratic per tick;
//! a delta-driven pass (only leaders whose points changed since the last
//! tick) is the known follow-up if either table grows large.

use std::sync::Arc;

use questboard_domain::UserAchievement;

use crate::infrastructure::ports::{
    AchievementRepo, LeaderRepo, RepoError, UserAchievementRepo,
};

pub struct AchievementSweep {
    achievements: Arc<dyn AchievementRepo>,
    leaders: Arc<dyn LeaderRepo>,
    user_achievements: Arc<dyn UserAchievementRepo>,
}

impl AchievementSweep {
    pub fn new(
        achievements: Arc<dyn AchievementRepo>,
        leaders: Arc<dyn LeaderRepo>,
        user_achievements: Arc<dyn UserAchievementRepo>,
    ) -> Self {
        Self {
            achievements,
            leaders,
            user_achievements,
        }
    }

    /// One sweep pass. Returns the number of unlocks granted.
    pub async fn execute(&self) -> Result<u32, RepoError> {
        let achievements = self.achievements.list_all().await?;
        let leaders = self.leaders.list_all().await?;

        let mut granted = 0;
        for achievement in &achievements {
            for leader in &leaders {
                if leader.points < achievement.points {
                    continue;
                }
                let existing = self
                    .user_achievements
                    .find_by_user_and_achievement(leader.user, achievement.id)
                    .await?;
                if existing.is_some() {
                    continue;
                }
                self.user_achievements
                    .create(&UserAchievement::new(leader.user, achievement.id))
                    .await?;
                granted += 1;
                tracing::info!(
                    user_id = %leader.user,
                    achievement_id = %achievement.id,
                    "Achievement unlocked"
                );
            }
        }
        Ok(granted)
    }
}
