//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::persistence::SqliteRepositories;
use crate::infrastructure::ports::{
    AchievementRepo, AuthPort, BadgeRepo, ChallengeRepo, LeaderRepo, Notifier, ProductRepo,
    UserAchievementRepo, UserChallengeRepo, UserRepo,
};
use crate::use_cases::achievement::{AchievementOps, AchievementSweep};
use crate::use_cases::challenge::{ChallengeOps, ChallengeUseCases, RecordProgress};
use crate::use_cases::leaderboard::LeaderboardOps;
use crate::use_cases::product::ProductOps;

/// Main application state.
///
/// Holds all repository ports and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub auth: Arc<dyn AuthPort>,
}

/// Container for all repository ports, injected directly as trait objects.
pub struct Repositories {
    pub users: Arc<dyn UserRepo>,
    pub challenges: Arc<dyn ChallengeRepo>,
    pub products: Arc<dyn ProductRepo>,
    pub user_challenges: Arc<dyn UserChallengeRepo>,
    pub leaders: Arc<dyn LeaderRepo>,
    pub badges: Arc<dyn BadgeRepo>,
    pub achievements: Arc<dyn AchievementRepo>,
    pub user_achievements: Arc<dyn UserAchievementRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub challenge: ChallengeUseCases,
    pub leaderboard: Arc<LeaderboardOps>,
    pub product: ProductOps,
    pub achievement: AchievementOps,
    pub sweep: Arc<AchievementSweep>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repos: SqliteRepositories,
        notifier: Arc<dyn Notifier>,
        auth: Arc<dyn AuthPort>,
    ) -> Self {
        // Port traits from SQLite - used directly
        let user_repo: Arc<dyn UserRepo> = repos.users.clone();
        let challenge_repo: Arc<dyn ChallengeRepo> = repos.challenges.clone();
        let product_repo: Arc<dyn ProductRepo> = repos.products.clone();
        let user_challenge_repo: Arc<dyn UserChallengeRepo> = repos.user_challenges.clone();
        let leader_repo: Arc<dyn LeaderRepo> = repos.leaders.clone();
        let badge_repo: Arc<dyn BadgeRepo> = repos.badges.clone();
        let achievement_repo: Arc<dyn AchievementRepo> = repos.achievements.clone();
        let user_achievement_repo: Arc<dyn UserAchievementRepo> = repos.user_achievements.clone();

        let repositories = Repositories {
            users: user_repo.clone(),
            challenges: challenge_repo.clone(),
            products: product_repo.clone(),
            user_challenges: user_challenge_repo.clone(),
            leaders: leader_repo.clone(),
            badges: badge_repo.clone(),
            achievements: achievement_repo.clone(),
            user_achievements: user_achievement_repo.clone(),
        };

        let leaderboard = Arc::new(LeaderboardOps::new(
            leader_repo.clone(),
            user_repo.clone(),
        ));

        let challenge = ChallengeUseCases {
            ops: Arc::new(ChallengeOps::new(challenge_repo.clone())),
            record_progress: Arc::new(RecordProgress::new(
                challenge_repo,
                product_repo.clone(),
                user_challenge_repo,
                leaderboard.clone(),
                notifier,
            )),
        };

        let use_cases = UseCases {
            challenge,
            leaderboard,
            product: ProductOps::new(product_repo),
            achievement: AchievementOps::new(
                badge_repo,
                achievement_repo.clone(),
                user_achievement_repo.clone(),
            ),
            sweep: Arc::new(AchievementSweep::new(
                achievement_repo,
                leader_repo,
                user_achievement_repo,
            )),
        };

        Self {
            repositories,
            use_cases,
            auth,
        }
    }
}
