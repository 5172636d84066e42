//! Achievement use cases: badge/achievement creation and user unlock listing.

use std::sync::Arc;

use questboard_domain::{Achievement, Badge, BadgeId, Page, UserAchievementId, UserId};
use serde::Serialize;

use crate::infrastructure::ports::{
    AchievementRepo, BadgeRepo, RepoError, UserAchievementRepo,
};
use crate::use_cases::validation::{self, ValidationError};

pub mod sweep;

pub use sweep::AchievementSweep;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 20;
const MAX_DESCRIPTION_LEN: usize = 100;

pub struct CreateBadgeInput {
    pub name: String,
    pub description: String,
    pub icon: String,
}

pub struct CreateAchievementInput {
    pub name: String,
    pub points: u32,
    pub description: String,
    pub badge: BadgeId,
}

/// A user's unlock with its achievement and badge resolved for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAchievementView {
    pub id: UserAchievementId,
    pub achievement: Achievement,
    pub badge: Badge,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub struct AchievementOps {
    badges: Arc<dyn BadgeRepo>,
    achievements: Arc<dyn AchievementRepo>,
    user_achievements: Arc<dyn UserAchievementRepo>,
}

impl AchievementOps {
    pub fn new(
        badges: Arc<dyn BadgeRepo>,
        achievements: Arc<dyn AchievementRepo>,
        user_achievements: Arc<dyn UserAchievementRepo>,
    ) -> Self {
        Self {
            badges,
            achievements,
            user_achievements,
        }
    }

    pub async fn create_badge(&self, input: CreateBadgeInput) -> Result<Badge, AchievementError> {
        validation::require_non_empty(&input.name, "name")?;
        validation::require_non_empty(&input.description, "description")?;
        validation::require_max_length(&input.description, MAX_DESCRIPTION_LEN, "description")?;
        validation::require_non_empty(&input.icon, "icon")?;

        let badge = Badge::new(input.name, input.description, input.icon);
        self.badges.save(&badge).await?;
        Ok(badge)
    }

    pub async fn create_achievement(
        &self,
        input: CreateAchievementInput,
    ) -> Result<Achievement, AchievementError> {
        validation::require_non_empty(&input.name, "name")?;
        validation::require_non_empty(&input.description, "description")?;
        validation::require_max_length(&input.description, MAX_DESCRIPTION_LEN, "description")?;

        self.badges
            .get(input.badge)
            .await?
            .ok_or(AchievementError::BadgeNotFound(input.badge))?;

        let achievement =
            Achievement::new(input.name, input.points, input.description, input.badge);
        self.achievements.save(&achievement).await?;
        Ok(achievement)
    }

    /// The caller's unlocks, newest first, with achievement and badge joined.
    pub async fn list_for_user(
        &self,
        user: UserId,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Page<UserAchievementView>, AchievementError> {
        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).max(1);

        let unlocks = self.user_achievements.list_for_user(user, page, limit).await?;

        let mut views = Vec::with_capacity(unlocks.docs.len());
        for unlock in &unlocks.docs {
            let Some(achievement) = self.achievements.get(unlock.achievement).await? else {
                tracing::warn!(
                    achievement_id = %unlock.achievement,
                    "Unlock references a missing achievement, skipping"
                );
                continue;
            };
            let Some(badge) = self.badges.get(achievement.badge).await? else {
                tracing::warn!(
                    badge_id = %achievement.badge,
                    "Achievement references a missing badge, skipping"
                );
                continue;
            };
            views.push(UserAchievementView {
                id: unlock.id,
                achievement,
                badge,
                created_at: unlock.created_at,
            });
        }

        Ok(Page::new(views, unlocks.total_docs, page, limit))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AchievementError {
    #[error("This badge does not exist")]
    BadgeNotFound(BadgeId),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<ValidationError> for AchievementError {
    fn from(err: ValidationError) -> Self {
        AchievementError::Validation(err.to_string())
    }
}
