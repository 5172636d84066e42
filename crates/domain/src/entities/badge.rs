//! Badge entity - the visual reward attached to an achievement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::BadgeId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: BadgeId,
    pub name: String,
    pub description: String,
    /// Icon URL shown next to the badge.
    pub icon: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Badge {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BadgeId::new(),
            name: name.into(),
            description: description.into(),
            icon: icon.into(),
            created_at: now,
            updated_at: now,
        }
    }
}
