//! SQLite storage for leaderboard rows.
//!
//! Point awards are a single upsert-add statement keyed on user_id, so
//! simultaneous completions of different challenges by the same user can
//! never lose an award.

use std::sync::Arc;

use async_trait::async_trait;
use questboard_domain::{Leader, LeaderId, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_datetime, parse_uuid};
use crate::infrastructure::ports::{ClockPort, LeaderRepo, RepoError};

pub struct SqliteLeaderRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteLeaderRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn row_to_leader(row: &SqliteRow) -> Result<Leader, RepoError> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let points: i64 = row.get("points");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Leader {
        id: LeaderId::from_uuid(parse_uuid(&id)?),
        user: UserId::from_uuid(parse_uuid(&user_id)?),
        points: points as u32,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

#[async_trait]
impl LeaderRepo for SqliteLeaderRepo {
    async fn find_by_user(&self, user: UserId) -> Result<Option<Leader>, RepoError> {
        let row = sqlx::query("SELECT * FROM leaders WHERE user_id = ?")
            .bind(user.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("leader.find_by_user", e))?;

        row.as_ref().map(row_to_leader).transpose()
    }

    async fn award_points(&self, user: UserId, points: u32) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO leaders (id, user_id, points, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                points = points + excluded.points,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(LeaderId::new().to_string())
        .bind(user.to_string())
        .bind(points as i64)
        .bind(now.clone())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("leader.award_points", e))?;

        Ok(())
    }

    async fn top_n(&self, n: u32) -> Result<Vec<Leader>, RepoError> {
        let rows = sqlx::query(
            "SELECT * FROM leaders ORDER BY points DESC, created_at ASC, id ASC LIMIT ?",
        )
        .bind(n as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("leader.top_n", e))?;

        rows.iter().map(row_to_leader).collect()
    }

    async fn list_all(&self) -> Result<Vec<Leader>, RepoError> {
        let rows = sqlx::query("SELECT * FROM leaders")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("leader.list_all", e))?;

        rows.iter().map(row_to_leader).collect()
    }
}
