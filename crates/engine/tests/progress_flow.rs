//! Cross-layer flow tests: the progress/award pipeline over real SQLite
//! repositories, with broadcasts captured by a recording notifier.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;

use questboard_domain::{
    Achievement, Badge, Challenge, ChallengeType, Product, User, UserChallengeStatus,
};
use questboard_shared::{LeaderboardEntry, ServerMessage};

use questboard_engine::infrastructure::clock::SystemClock;
use questboard_engine::infrastructure::persistence::{
    ensure_schema, SqliteRepositories,
};
use questboard_engine::infrastructure::ports::{
    AchievementRepo, BadgeRepo, ChallengeRepo, ClockPort, LeaderRepo, Notifier, ProductRepo,
    UserAchievementRepo, UserChallengeRepo, UserRepo,
};
use questboard_engine::use_cases::achievement::AchievementSweep;
use questboard_engine::use_cases::challenge::{ProgressError, RecordProgress};
use questboard_engine::use_cases::leaderboard::LeaderboardOps;

/// Captures every broadcast for assertions.
#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<ServerMessage>>,
}

impl RecordingNotifier {
    fn leaderboard_updates(&self) -> Vec<Vec<LeaderboardEntry>> {
        self.messages
            .lock()
            .expect("lock")
            .iter()
            .filter_map(|msg| match msg {
                ServerMessage::LeaderboardUpdate { leaders } => Some(leaders.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn broadcast(&self, message: ServerMessage) {
        self.messages.lock().expect("lock").push(message);
    }
}

struct Flow {
    repos: SqliteRepositories,
    engine: Arc<RecordProgress>,
    leaderboard: Arc<LeaderboardOps>,
    notifier: Arc<RecordingNotifier>,
}

async fn flow() -> Flow {
    // Single connection so every query sees the same in-memory store.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    ensure_schema(&pool).await.expect("create schema");

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let repos = SqliteRepositories::new(pool, clock);

    let notifier = Arc::new(RecordingNotifier::default());
    let leaderboard = Arc::new(LeaderboardOps::new(
        repos.leaders.clone(),
        repos.users.clone(),
    ));
    let engine = Arc::new(RecordProgress::new(
        repos.challenges.clone(),
        repos.products.clone(),
        repos.user_challenges.clone(),
        leaderboard.clone(),
        notifier.clone(),
    ));

    Flow {
        repos,
        engine,
        leaderboard,
        notifier,
    }
}

async fn seed_user(flow: &Flow, name: &str, email: &str) -> User {
    let user = User::new(name, email);
    flow.repos.users.save(&user).await.expect("seed user");
    user
}

#[tokio::test]
async fn test_like_completion_awards_and_broadcasts() {
    let f = flow().await;
    let user = seed_user(&f, "Ada Lovelace", "ada@example.com").await;

    let challenge = Challenge::new(ChallengeType::Like, 1, 10, "like a product");
    f.repos.challenges.save(&challenge).await.expect("seed challenge");
    let product = Product::new("Product A");
    f.repos.products.save(&product).await.expect("seed product");

    let record = f
        .engine
        .execute(user.id, challenge.id(), product.id(), None)
        .await
        .expect("progress");

    assert_eq!(record.progress(), 1);
    assert_eq!(record.status(), UserChallengeStatus::Completed);
    assert_eq!(record.points(), 10);

    let stored_product = f
        .repos
        .products
        .get(product.id())
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored_product.like_count(), 1);

    let leader = f
        .repos
        .leaders
        .find_by_user(user.id)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(leader.points, 10);

    let updates = f.notifier.leaderboard_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0][0].user.full_name, "Ada Lovelace");
    assert_eq!(updates[0][0].points, 10);
}

#[tokio::test]
async fn test_comment_progression_completes_on_third_call() {
    let f = flow().await;
    let user = seed_user(&f, "Grace Hopper", "grace@example.com").await;

    let challenge = Challenge::new(ChallengeType::Comment, 3, 5, "comment thrice");
    f.repos.challenges.save(&challenge).await.expect("seed challenge");
    let product = Product::new("Product A");
    f.repos.products.save(&product).await.expect("seed product");

    for comment in ["x", "y"] {
        let record = f
            .engine
            .execute(
                user.id,
                challenge.id(),
                product.id(),
                Some(comment.to_string()),
            )
            .await
            .expect("progress");
        assert_eq!(record.status(), UserChallengeStatus::Inprogress);
        // No award before the completing call.
        assert!(f
            .repos
            .leaders
            .find_by_user(user.id)
            .await
            .expect("find")
            .is_none());
    }

    let record = f
        .engine
        .execute(user.id, challenge.id(), product.id(), Some("z".to_string()))
        .await
        .expect("completing call");
    assert_eq!(record.progress(), 3);
    assert_eq!(record.status(), UserChallengeStatus::Completed);

    let stored_product = f
        .repos
        .products
        .get(product.id())
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored_product.comments(), ["x", "y", "z"]);

    assert_eq!(f.notifier.leaderboard_updates().len(), 1);
}

#[tokio::test]
async fn test_replay_after_completion_changes_nothing() {
    let f = flow().await;
    let user = seed_user(&f, "Ada Lovelace", "ada@example.com").await;

    let challenge = Challenge::new(ChallengeType::Like, 1, 10, "like a product");
    f.repos.challenges.save(&challenge).await.expect("seed challenge");
    let product = Product::new("Product A");
    f.repos.products.save(&product).await.expect("seed product");

    f.engine
        .execute(user.id, challenge.id(), product.id(), None)
        .await
        .expect("completing call");

    let err = f
        .engine
        .execute(user.id, challenge.id(), product.id(), None)
        .await
        .expect_err("replay must fail");
    assert!(matches!(err, ProgressError::AlreadyCompleted));

    let stored_product = f
        .repos
        .products
        .get(product.id())
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored_product.like_count(), 1);
    let leader = f
        .repos
        .leaders
        .find_by_user(user.id)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(leader.points, 10);
    assert_eq!(f.notifier.leaderboard_updates().len(), 1);
}

#[tokio::test]
async fn test_concurrent_submissions_do_not_lose_progress() {
    let f = flow().await;
    let user = seed_user(&f, "Ada Lovelace", "ada@example.com").await;

    let challenge = Challenge::new(ChallengeType::Like, 5, 10, "like five products");
    f.repos.challenges.save(&challenge).await.expect("seed challenge");
    let product = Product::new("Product A");
    f.repos.products.save(&product).await.expect("seed product");

    let first = {
        let engine = f.engine.clone();
        let (user_id, challenge_id, product_id) = (user.id, challenge.id(), product.id());
        tokio::spawn(async move { engine.execute(user_id, challenge_id, product_id, None).await })
    };
    let second = {
        let engine = f.engine.clone();
        let (user_id, challenge_id, product_id) = (user.id, challenge.id(), product.id());
        tokio::spawn(async move { engine.execute(user_id, challenge_id, product_id, None).await })
    };

    first.await.expect("join").expect("first call");
    second.await.expect("join").expect("second call");

    let record = f
        .repos
        .user_challenges
        .find_by_user_and_challenge(user.id, challenge.id())
        .await
        .expect("find")
        .expect("present");
    assert_eq!(record.progress(), 2);

    let stored_product = f
        .repos
        .products
        .get(product.id())
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored_product.like_count(), 2);
}

#[tokio::test]
async fn test_top_n_snapshot_ranks_across_users() {
    let f = flow().await;
    let ada = seed_user(&f, "Ada Lovelace", "ada@example.com").await;
    let grace = seed_user(&f, "Grace Hopper", "grace@example.com").await;

    f.leaderboard.award_points(ada.id, 10).await.expect("award");
    f.leaderboard.award_points(grace.id, 25).await.expect("award");
    f.leaderboard.award_points(ada.id, 5).await.expect("award");

    let top = f.leaderboard.top_n(10).await.expect("top_n");
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].user.full_name, "Grace Hopper");
    assert_eq!(top[0].points, 25);
    assert_eq!(top[1].user.full_name, "Ada Lovelace");
    assert_eq!(top[1].points, 15);
}

#[tokio::test]
async fn test_sweep_unlocks_crossed_thresholds_once() {
    let f = flow().await;
    let ada = seed_user(&f, "Ada Lovelace", "ada@example.com").await;
    let grace = seed_user(&f, "Grace Hopper", "grace@example.com").await;

    let badge = Badge::new("Gold Star", "Awarded for outstanding performance", "gold.png");
    f.repos.badges.save(&badge).await.expect("seed badge");
    let achievement = Achievement::new("Ten Club", 10, "Reach ten points", badge.id);
    f.repos
        .achievements
        .save(&achievement)
        .await
        .expect("seed achievement");

    f.leaderboard.award_points(ada.id, 12).await.expect("award");
    f.leaderboard.award_points(grace.id, 5).await.expect("award");

    let sweep = AchievementSweep::new(
        f.repos.achievements.clone(),
        f.repos.leaders.clone(),
        f.repos.user_achievements.clone(),
    );

    assert_eq!(sweep.execute().await.expect("sweep"), 1);
    // Second pass grants nothing new.
    assert_eq!(sweep.execute().await.expect("sweep"), 0);

    let unlock = f
        .repos
        .user_achievements
        .find_by_user_and_achievement(ada.id, achievement.id)
        .await
        .expect("find")
        .expect("granted");
    assert_eq!(unlock.user, ada.id);

    assert!(f
        .repos
        .user_achievements
        .find_by_user_and_achievement(grace.id, achievement.id)
        .await
        .expect("find")
        .is_none());
}
