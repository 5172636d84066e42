//! SQLite storage for badges.

use std::sync::Arc;

use async_trait::async_trait;
use questboard_domain::{Badge, BadgeId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_datetime, parse_uuid};
use crate::infrastructure::ports::{BadgeRepo, ClockPort, RepoError};

pub struct SqliteBadgeRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteBadgeRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn row_to_badge(row: &SqliteRow) -> Result<Badge, RepoError> {
    let id: String = row.get("id");
    let name: String = row.get("name");
    let description: String = row.get("description");
    let icon: String = row.get("icon");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Badge {
        id: BadgeId::from_uuid(parse_uuid(&id)?),
        name,
        description,
        icon,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

#[async_trait]
impl BadgeRepo for SqliteBadgeRepo {
    async fn get(&self, id: BadgeId) -> Result<Option<Badge>, RepoError> {
        let row = sqlx::query("SELECT * FROM badges WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("badge.get", e))?;

        row.as_ref().map(row_to_badge).transpose()
    }

    async fn save(&self, badge: &Badge) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO badges (id, name, description, icon, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                icon = excluded.icon,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(badge.id.to_string())
        .bind(&badge.name)
        .bind(&badge.description)
        .bind(&badge.icon)
        .bind(badge.created_at.to_rfc3339())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("badge.save", e))?;

        Ok(())
    }
}
