//! SQLite-backed persistence.
//!
//! One repository per aggregate, all sharing a `SqlitePool`. Timestamps are
//! stored as RFC 3339 text and stamped through the injected clock port.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::infrastructure::ports::{ClockPort, RepoError};

mod achievement_repository;
mod badge_repository;
mod challenge_repository;
mod leader_repository;
mod product_repository;
mod user_achievement_repository;
mod user_challenge_repository;
mod user_repository;

pub use achievement_repository::SqliteAchievementRepo;
pub use badge_repository::SqliteBadgeRepo;
pub use challenge_repository::SqliteChallengeRepo;
pub use leader_repository::SqliteLeaderRepo;
pub use product_repository::SqliteProductRepo;
pub use user_achievement_repository::SqliteUserAchievementRepo;
pub use user_challenge_repository::SqliteUserChallengeRepo;
pub use user_repository::SqliteUserRepo;

/// Table definitions, one statement per entry.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS challenges (
        id TEXT PRIMARY KEY,
        type TEXT NOT NULL,
        target INTEGER NOT NULL,
        points INTEGER NOT NULL,
        description TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        like_count INTEGER NOT NULL DEFAULT 0,
        comments TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_challenges (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        challenge_id TEXT NOT NULL,
        target INTEGER NOT NULL,
        progress INTEGER NOT NULL DEFAULT 0,
        points INTEGER NOT NULL DEFAULT 0,
        status TEXT NOT NULL,
        version INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (user_id, challenge_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leaders (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL UNIQUE,
        points INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS badges (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        icon TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS achievements (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        points INTEGER NOT NULL,
        description TEXT NOT NULL,
        badge_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_achievements (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        achievement_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (user_id, achievement_id)
    )
    "#,
];

/// Open (or create) the database behind `database_url`.
pub async fn connect(database_url: &str) -> Result<SqlitePool, RepoError> {
    SqlitePoolOptions::new()
        .connect(database_url)
        .await
        .map_err(|e| RepoError::database("connect", e))
}

/// Ensure all tables exist.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }
    Ok(())
}

/// All SQLite repositories, sharing one pool and clock.
pub struct SqliteRepositories {
    pub users: Arc<SqliteUserRepo>,
    pub challenges: Arc<SqliteChallengeRepo>,
    pub products: Arc<SqliteProductRepo>,
    pub user_challenges: Arc<SqliteUserChallengeRepo>,
    pub leaders: Arc<SqliteLeaderRepo>,
    pub badges: Arc<SqliteBadgeRepo>,
    pub achievements: Arc<SqliteAchievementRepo>,
    pub user_achievements: Arc<SqliteUserAchievementRepo>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            users: Arc::new(SqliteUserRepo::new(pool.clone(), clock.clone())),
            challenges: Arc::new(SqliteChallengeRepo::new(pool.clone(), clock.clone())),
            products: Arc::new(SqliteProductRepo::new(pool.clone(), clock.clone())),
            user_challenges: Arc::new(SqliteUserChallengeRepo::new(pool.clone(), clock.clone())),
            leaders: Arc::new(SqliteLeaderRepo::new(pool.clone(), clock.clone())),
            badges: Arc::new(SqliteBadgeRepo::new(pool.clone(), clock.clone())),
            achievements: Arc::new(SqliteAchievementRepo::new(pool.clone(), clock.clone())),
            user_achievements: Arc::new(SqliteUserAchievementRepo::new(pool, clock)),
        }
    }
}

pub(crate) fn parse_datetime(value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(RepoError::serialization)
}

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(value).map_err(RepoError::serialization)
}

/// In-memory database for repository tests. Capped at a single connection so
/// every query sees the same memory store.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");
    ensure_schema(&pool).await.expect("create schema");
    pool
}
