//! SQLite storage for achievements.

use std::sync::Arc;

use async_trait::async_trait;
use questboard_domain::{Achievement, AchievementId, BadgeId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_datetime, parse_uuid};
use crate::infrastructure::ports::{AchievementRepo, ClockPort, RepoError};

pub struct SqliteAchievementRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteAchievementRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn row_to_achievement(row: &SqliteRow) -> Result<Achievement, RepoError> {
    let id: String = row.get("id");
    let name: String = row.get("name");
    let points: i64 = row.get("points");
    let description: String = row.get("description");
    let badge_id: String = row.get("badge_id");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Achievement {
        id: AchievementId::from_uuid(parse_uuid(&id)?),
        name,
        points: points as u32,
        description,
        badge: BadgeId::from_uuid(parse_uuid(&badge_id)?),
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

#[async_trait]
impl AchievementRepo for SqliteAchievementRepo {
    async fn get(&self, id: AchievementId) -> Result<Option<Achievement>, RepoError> {
        let row = sqlx::query("SELECT * FROM achievements WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("achievement.get", e))?;

        row.as_ref().map(row_to_achievement).transpose()
    }

    async fn save(&self, achievement: &Achievement) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO achievements (id, name, points, description, badge_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                points = excluded.points,
                description = excluded.description,
                badge_id = excluded.badge_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(achievement.id.to_string())
        .bind(&achievement.name)
        .bind(achievement.points as i64)
        .bind(&achievement.description)
        .bind(achievement.badge.to_string())
        .bind(achievement.created_at.to_rfc3339())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("achievement.save", e))?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Achievement>, RepoError> {
        let rows = sqlx::query("SELECT * FROM achievements")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("achievement.list_all", e))?;

        rows.iter().map(row_to_achievement).collect()
    }
}
