//! Achievement entity - a point-threshold milestone.
//!
//! Unlocked (once per user) when the user's leaderboard total crosses
//! `points`. The sweep job compares leader totals against these thresholds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AchievementId, BadgeId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    /// Leaderboard total required to unlock.
    pub points: u32,
    pub description: String,
    pub badge: BadgeId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Achievement {
    pub fn new(
        name: impl Into<String>,
        points: u32,
        description: impl Into<String>,
        badge: BadgeId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AchievementId::new(),
            name: name.into(),
            points,
            description: description.into(),
            badge,
            created_at: now,
            updated_at: now,
        }
    }
}
