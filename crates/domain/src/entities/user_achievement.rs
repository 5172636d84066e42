//! UserAchievement entity - records that a user unlocked an achievement.
//!
//! Created at most once per (user, achievement) pair; never updated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AchievementId, UserAchievementId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAchievement {
    pub id: UserAchievementId,
    pub user: UserId,
    pub achievement: AchievementId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAchievement {
    pub fn new(user: UserId, achievement: AchievementId) -> Self {
        let now = Utc::now();
        Self {
            id: UserAchievementId::new(),
            user,
            achievement,
            created_at: now,
            updated_at: now,
        }
    }
}
