//! Challenge progress recording - the completion and award pipeline.
//!
//! One call applies exactly one unit of progress for a (user, challenge)
//! pair against a product: locate or create the progress record, apply the
//! type-specific product side effect, decide completion, and on the
//! completing call award points and broadcast the refreshed top-10.
//!
//! Concurrent calls for the same pair are serialized through a per-key
//! mutex; the versioned user-challenge save is the storage-level backstop
//! should two writers ever slip past it.

use std::sync::Arc;

use dashmap::DashMap;
use questboard_domain::{
    Challenge, ChallengeId, ChallengeType, ProductId, UserChallenge, UserId,
};
use questboard_shared::ServerMessage;
use tokio::sync::Mutex;

use crate::infrastructure::ports::{
    ChallengeRepo, Notifier, ProductRepo, RepoError, UserChallengeRepo,
};
use crate::use_cases::leaderboard::{LeaderboardOps, DEFAULT_TOP_N};

pub struct RecordProgress {
    challenges: Arc<dyn ChallengeRepo>,
    products: Arc<dyn ProductRepo>,
    user_challenges: Arc<dyn UserChallengeRepo>,
    leaderboard: Arc<LeaderboardOps>,
    notifier: Arc<dyn Notifier>,
    /// One mutex per (user, challenge) pair currently known to this process.
    locks: DashMap<(UserId, ChallengeId), Arc<Mutex<()>>>,
}

impl RecordProgress {
    pub fn new(
        challenges: Arc<dyn ChallengeRepo>,
        products: Arc<dyn ProductRepo>,
        user_challenges: Arc<dyn UserChallengeRepo>,
        leaderboard: Arc<LeaderboardOps>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            challenges,
            products,
            user_challenges,
            leaderboard,
            notifier,
            locks: DashMap::new(),
        }
    }

    /// Record one unit of progress.
    ///
    /// Returns the persisted progress record. `comment` is only meaningful
    /// for Comment-type challenges; an absent comment is tolerated and
    /// stored as an empty string.
    pub async fn execute(
        &self,
        user: UserId,
        challenge_id: ChallengeId,
        product_id: ProductId,
        comment: Option<String>,
    ) -> Result<UserChallenge, ProgressError> {
        let challenge = self
            .challenges
            .get(challenge_id)
            .await?
            .ok_or(ProgressError::ChallengeNotFound(challenge_id))?;

        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or(ProgressError::ProductNotFound(product_id))?;

        // Serialize concurrent submissions for this (user, challenge) pair;
        // the lock spans the whole read-modify-write.
        let lock = self.lock_for(user, challenge_id);
        let _guard = lock.lock().await;

        let mut user_challenge = match self
            .user_challenges
            .find_by_user_and_challenge(user, challenge_id)
            .await?
        {
            Some(existing) if existing.is_completed() => {
                return Err(ProgressError::AlreadyCompleted);
            }
            Some(existing) => existing,
            None => {
                let created = UserChallenge::new(user, challenge_id, challenge.target());
                self.user_challenges.create(&created).await?;
                created
            }
        };

        let completed_now = user_challenge
            .advance()
            .map_err(|_| ProgressError::AlreadyCompleted)?;

        if completed_now {
            user_challenge.set_awarded_points(challenge.points());
            self.leaderboard
                .award_points(user, challenge.points())
                .await?;

            let leaders = self.leaderboard.top_n(DEFAULT_TOP_N).await?;
            self.notifier
                .broadcast(ServerMessage::LeaderboardUpdate { leaders })
                .await;

            tracing::info!(
                user_id = %user,
                challenge_id = %challenge_id,
                points = challenge.points(),
                "Challenge completed, points awarded"
            );
        }

        // Both final persists go out together. There is no rollback: if one
        // lands and the other fails, the stores have diverged and the only
        // remedy is the alert below.
        let (product_write, progress_write) = tokio::join!(
            self.apply_product_effect(&challenge, product.id(), comment),
            self.user_challenges.save(&user_challenge),
        );

        if product_write.is_ok() != progress_write.is_ok() {
            tracing::error!(
                user_id = %user,
                challenge_id = %challenge_id,
                product_id = %product_id,
                product_write = ?product_write,
                progress_write = ?progress_write,
                "Partial persist: product and user-challenge stores diverged"
            );
        }
        product_write?;
        progress_write?;

        Ok(user_challenge)
    }

    /// Apply the challenge-type-specific side effect to the product.
    ///
    /// Counter-only types (currently `Share`) leave the product untouched.
    async fn apply_product_effect(
        &self,
        challenge: &Challenge,
        product_id: ProductId,
        comment: Option<String>,
    ) -> Result<(), RepoError> {
        match challenge.challenge_type() {
            ChallengeType::Like => self.products.increment_likes(product_id).await,
            ChallengeType::Comment => {
                self.products
                    .append_comment(product_id, comment.unwrap_or_default())
                    .await
            }
            ChallengeType::Share => Ok(()),
        }
    }

    fn lock_for(&self, user: UserId, challenge: ChallengeId) -> Arc<Mutex<()>> {
        self.locks.entry((user, challenge)).or_default().clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("This challenge does not exist")]
    ChallengeNotFound(ChallengeId),
    #[error("Product not found")]
    ProductNotFound(ProductId),
    #[error("You have completed this challenge")]
    AlreadyCompleted,
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
