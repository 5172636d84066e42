//! SQLite storage for user achievement unlocks.
//!
//! The unique (user_id, achievement_id) index guarantees at most one unlock
//! per pair even if two sweep ticks race.

use std::sync::Arc;

use async_trait::async_trait;
use questboard_domain::{AchievementId, Page, UserAchievement, UserAchievementId, UserId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_datetime, parse_uuid};
use crate::infrastructure::ports::{ClockPort, RepoError, UserAchievementRepo};

pub struct SqliteUserAchievementRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteUserAchievementRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn row_to_user_achievement(row: &SqliteRow) -> Result<UserAchievement, RepoError> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let achievement_id: String = row.get("achievement_id");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(UserAchievement {
        id: UserAchievementId::from_uuid(parse_uuid(&id)?),
        user: UserId::from_uuid(parse_uuid(&user_id)?),
        achievement: AchievementId::from_uuid(parse_uuid(&achievement_id)?),
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

#[async_trait]
impl UserAchievementRepo for SqliteUserAchievementRepo {
    async fn find_by_user_and_achievement(
        &self,
        user: UserId,
        achievement: AchievementId,
    ) -> Result<Option<UserAchievement>, RepoError> {
        let row = sqlx::query(
            "SELECT * FROM user_achievements WHERE user_id = ? AND achievement_id = ?",
        )
        .bind(user.to_string())
        .bind(achievement.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("user_achievement.find", e))?;

        row.as_ref().map(row_to_user_achievement).transpose()
    }

    async fn create(&self, user_achievement: &UserAchievement) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO user_achievements (id, user_id, achievement_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_achievement.id.to_string())
        .bind(user_achievement.user.to_string())
        .bind(user_achievement.achievement.to_string())
        .bind(now.clone())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("user_achievement.create", e))?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user: UserId,
        page: u32,
        limit: u32,
    ) -> Result<Page<UserAchievement>, RepoError> {
        let offset = page.saturating_sub(1) * limit;

        let total: i64 = sqlx::query(
            "SELECT COUNT(*) AS n FROM user_achievements WHERE user_id = ?",
        )
        .bind(user.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::database("user_achievement.list_for_user", e))?
        .get("n");

        let rows = sqlx::query(
            r#"
            SELECT * FROM user_achievements
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user.to_string())
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("user_achievement.list_for_user", e))?;

        let docs = rows
            .iter()
            .map(row_to_user_achievement)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(docs, total as u64, page, limit))
    }
}
