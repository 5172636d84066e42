//! Leader entity - a user's cumulative point total on the leaderboard.
//!
//! One row per user, created on the first challenge completion and mutated
//! in place afterwards. Points only ever increase, and only via completed
//! challenges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{LeaderId, UserId};

/// A leaderboard entry: one user's running point total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leader {
    pub id: LeaderId,
    pub user: UserId,
    pub points: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Leader {
    /// Create a leaderboard row with an initial award.
    pub fn new(user: UserId, points: u32) -> Self {
        let now = Utc::now();
        Self {
            id: LeaderId::new(),
            user,
            points,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a completed challenge's points to the running total.
    pub fn award(&mut self, points: u32) {
        self.points += points;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_awards_accumulate() {
        let mut leader = Leader::new(UserId::new(), 10);
        leader.award(5);
        leader.award(10);
        assert_eq!(leader.points, 25);
    }
}
