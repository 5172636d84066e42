//! Leaderboard ranking: point awards and the top-N snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use questboard_domain::UserId;
use questboard_shared::{LeaderboardEntry, LeaderboardUser};

use crate::infrastructure::ports::{LeaderRepo, RepoError, UserRepo};

/// Size of the broadcast snapshot.
pub const DEFAULT_TOP_N: u32 = 10;

pub struct LeaderboardOps {
    leaders: Arc<dyn LeaderRepo>,
    users: Arc<dyn UserRepo>,
}

impl LeaderboardOps {
    pub fn new(leaders: Arc<dyn LeaderRepo>, users: Arc<dyn UserRepo>) -> Self {
        Self { leaders, users }
    }

    /// Add a completed challenge's points to the user's running total,
    /// creating the leaderboard row on first completion.
    ///
    /// The underlying store applies this as one atomic upsert-add, so
    /// concurrent completions cannot lose an award.
    pub async fn award_points(&self, user: UserId, points: u32) -> Result<(), RepoError> {
        self.leaders.award_points(user, points).await
    }

    /// The `n` highest totals, points descending, joined with user display
    /// fields. Ties rank by row creation order then id, stable across calls.
    pub async fn top_n(&self, n: u32) -> Result<Vec<LeaderboardEntry>, RepoError> {
        let leaders = self.leaders.top_n(n).await?;

        let ids: Vec<UserId> = leaders.iter().map(|l| l.user).collect();
        let users: HashMap<UserId, _> = self
            .users
            .get_many(ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let entries = leaders
            .into_iter()
            .filter_map(|leader| match users.get(&leader.user) {
                Some(user) => Some(LeaderboardEntry {
                    user: LeaderboardUser {
                        full_name: user.full_name.clone(),
                        email: user.email.clone(),
                    },
                    points: leader.points,
                }),
                None => {
                    tracing::warn!(
                        user_id = %leader.user,
                        "Leaderboard row references a missing user, skipping entry"
                    );
                    None
                }
            })
            .collect();

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questboard_domain::{Leader, User};

    use crate::infrastructure::ports::{MockLeaderRepo, MockUserRepo};

    fn user(name: &str, email: &str) -> User {
        User::new(name, email)
    }

    #[tokio::test]
    async fn test_top_n_joins_display_fields_in_rank_order() {
        let ada = user("Ada Lovelace", "ada@example.com");
        let grace = user("Grace Hopper", "grace@example.com");
        let ranked = vec![Leader::new(grace.id, 20), Leader::new(ada.id, 10)];

        let mut leaders = MockLeaderRepo::new();
        leaders
            .expect_top_n()
            .returning(move |_| Ok(ranked.clone()));

        let mut users = MockUserRepo::new();
        let all = vec![ada.clone(), grace.clone()];
        users
            .expect_get_many()
            .returning(move |_| Ok(all.clone()));

        let ops = LeaderboardOps::new(Arc::new(leaders), Arc::new(users));
        let top = ops.top_n(10).await.expect("top_n");

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].user.full_name, "Grace Hopper");
        assert_eq!(top[0].points, 20);
        assert_eq!(top[1].user.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_top_n_skips_leaders_without_users() {
        let ada = user("Ada Lovelace", "ada@example.com");
        let orphan = Leader::new(UserId::new(), 50);
        let ranked = vec![orphan, Leader::new(ada.id, 10)];

        let mut leaders = MockLeaderRepo::new();
        leaders
            .expect_top_n()
            .returning(move |_| Ok(ranked.clone()));

        let mut users = MockUserRepo::new();
        let all = vec![ada.clone()];
        users
            .expect_get_many()
            .returning(move |_| Ok(all.clone()));

        let ops = LeaderboardOps::new(Arc::new(leaders), Arc::new(users));
        let top = ops.top_n(10).await.expect("top_n");

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].user.full_name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_award_points_delegates_to_store() {
        let mut leaders = MockLeaderRepo::new();
        let user_id = UserId::new();
        leaders
            .expect_award_points()
            .withf(move |u, p| *u == user_id && *p == 10)
            .times(1)
            .returning(|_, _| Ok(()));

        let ops = LeaderboardOps::new(Arc::new(leaders), Arc::new(MockUserRepo::new()));
        ops.award_points(user_id, 10).await.expect("award");
    }
}
