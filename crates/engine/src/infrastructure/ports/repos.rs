//! Repository port traits for database access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use questboard_domain::{
    Achievement, AchievementId, Badge, BadgeId, Challenge, ChallengeId, Leader, Page, Product,
    ProductId, User, UserAchievement, UserChallenge, UserId,
};

use super::error::RepoError;

/// Wall-clock port so repositories (and tests) agree on time.
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

// =============================================================================
// Database Ports (one per entity type)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError>;
    async fn save(&self, user: &User) -> Result<(), RepoError>;
    /// Batch lookup for leaderboard display joins.
    async fn get_many(&self, ids: Vec<UserId>) -> Result<Vec<User>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChallengeRepo: Send + Sync {
    async fn get(&self, id: ChallengeId) -> Result<Option<Challenge>, RepoError>;
    async fn save(&self, challenge: &Challenge) -> Result<(), RepoError>;
    /// Active challenges, newest first, optionally filtered by a
    /// case-insensitive description search.
    async fn list_active(
        &self,
        page: u32,
        limit: u32,
        search: Option<String>,
    ) -> Result<Page<Challenge>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepo: Send + Sync {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepoError>;
    async fn save(&self, product: &Product) -> Result<(), RepoError>;
    /// Atomic `like_count += 1`. Errors with NotFound if the row is gone.
    async fn increment_likes(&self, id: ProductId) -> Result<(), RepoError>;
    /// Atomic append to the comment list, preserving call order.
    async fn append_comment(&self, id: ProductId, comment: String) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserChallengeRepo: Send + Sync {
    async fn find_by_user_and_challenge(
        &self,
        user: UserId,
        challenge: ChallengeId,
    ) -> Result<Option<UserChallenge>, RepoError>;
    async fn create(&self, user_challenge: &UserChallenge) -> Result<(), RepoError>;
    /// Compare-and-swap save keyed on the record's version; a stale version
    /// surfaces as `RepoError::Conflict`, never a silent overwrite.
    async fn save(&self, user_challenge: &UserChallenge) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderRepo: Send + Sync {
    async fn find_by_user(&self, user: UserId) -> Result<Option<Leader>, RepoError>;
    /// Atomic upsert-add: creates the row with `points` or adds `points` to
    /// the existing total in a single statement.
    async fn award_points(&self, user: UserId, points: u32) -> Result<(), RepoError>;
    /// Highest totals first; ties resolved by creation order then id.
    async fn top_n(&self, n: u32) -> Result<Vec<Leader>, RepoError>;
    async fn list_all(&self) -> Result<Vec<Leader>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeRepo: Send + Sync {
    async fn get(&self, id: BadgeId) -> Result<Option<Badge>, RepoError>;
    async fn save(&self, badge: &Badge) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementRepo: Send + Sync {
    async fn get(&self, id: AchievementId) -> Result<Option<Achievement>, RepoError>;
    async fn save(&self, achievement: &Achievement) -> Result<(), RepoError>;
    async fn list_all(&self) -> Result<Vec<Achievement>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAchievementRepo: Send + Sync {
    async fn find_by_user_and_achievement(
        &self,
        user: UserId,
        achievement: AchievementId,
    ) -> Result<Option<UserAchievement>, RepoError>;
    async fn create(&self, user_achievement: &UserAchievement) -> Result<(), RepoError>;
    /// The user's unlocks, newest first.
    async fn list_for_user(
        &self,
        user: UserId,
        page: u32,
        limit: u32,
    ) -> Result<Page<UserAchievement>, RepoError>;
}
