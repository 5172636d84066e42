//! SQLite storage for user challenge progress records.
//!
//! Saves are versioned compare-and-swap: a save against a stale version
//! affects zero rows and surfaces as `RepoError::Conflict`. The unique
//! (user_id, challenge_id) index backs the one-record-per-pair invariant.

use std::sync::Arc;

use async_trait::async_trait;
use questboard_domain::{
    ChallengeId, UserChallenge, UserChallengeId, UserChallengeStatus, UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_datetime, parse_uuid};
use crate::infrastructure::ports::{ClockPort, RepoError, UserChallengeRepo};

pub struct SqliteUserChallengeRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteUserChallengeRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn row_to_user_challenge(row: &SqliteRow) -> Result<UserChallenge, RepoError> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let challenge_id: String = row.get("challenge_id");
    let target: i64 = row.get("target");
    let progress: i64 = row.get("progress");
    let points: i64 = row.get("points");
    let status: String = row.get("status");
    let version: i64 = row.get("version");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(UserChallenge::new(
        UserId::from_uuid(parse_uuid(&user_id)?),
        ChallengeId::from_uuid(parse_uuid(&challenge_id)?),
        target as u32,
    )
    .with_id(UserChallengeId::from_uuid(parse_uuid(&id)?))
    .with_progress(
        progress as u32,
        UserChallengeStatus::parse(&status).map_err(RepoError::serialization)?,
    )
    .with_points(points as u32)
    .with_version(version as u64)
    .with_timestamps(parse_datetime(&created_at)?, parse_datetime(&updated_at)?))
}

#[async_trait]
impl UserChallengeRepo for SqliteUserChallengeRepo {
    async fn find_by_user_and_challenge(
        &self,
        user: UserId,
        challenge: ChallengeId,
    ) -> Result<Option<UserChallenge>, RepoError> {
        let row = sqlx::query(
            "SELECT * FROM user_challenges WHERE user_id = ? AND challenge_id = ?",
        )
        .bind(user.to_string())
        .bind(challenge.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("user_challenge.find", e))?;

        row.as_ref().map(row_to_user_challenge).transpose()
    }

    async fn create(&self, user_challenge: &UserChallenge) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO user_challenges
                (id, user_id, challenge_id, target, progress, points, status, version, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_challenge.id().to_string())
        .bind(user_challenge.user().to_string())
        .bind(user_challenge.challenge().to_string())
        .bind(user_challenge.target() as i64)
        .bind(user_challenge.progress() as i64)
        .bind(user_challenge.points() as i64)
        .bind(user_challenge.status().as_str())
        .bind(user_challenge.version() as i64)
        .bind(now.clone())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("user_challenge.create", e))?;

        Ok(())
    }

    async fn save(&self, user_challenge: &UserChallenge) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE user_challenges
            SET progress = ?, points = ?, status = ?, version = version + 1, updated_at = ?
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(user_challenge.progress() as i64)
        .bind(user_challenge.points() as i64)
        .bind(user_challenge.status().as_str())
        .bind(now)
        .bind(user_challenge.id().to_string())
        .bind(user_challenge.version() as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("user_challenge.save", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::conflict("user_challenge.save", user_challenge.id()));
        }
        Ok(())
    }
}
