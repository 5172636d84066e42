//! SQLite storage for challenges.

use std::sync::Arc;

use async_trait::async_trait;
use questboard_domain::{Challenge, ChallengeId, ChallengeStatus, ChallengeType, Page};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_datetime, parse_uuid};
use crate::infrastructure::ports::{ChallengeRepo, ClockPort, RepoError};

pub struct SqliteChallengeRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteChallengeRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn row_to_challenge(row: &SqliteRow) -> Result<Challenge, RepoError> {
    let id: String = row.get("id");
    let challenge_type: String = row.get("type");
    let target: i64 = row.get("target");
    let points: i64 = row.get("points");
    let description: String = row.get("description");
    let status: String = row.get("status");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Challenge::new(
        ChallengeType::parse(&challenge_type).map_err(RepoError::serialization)?,
        target as u32,
        points as u32,
        description,
    )
    .with_id(ChallengeId::from_uuid(parse_uuid(&id)?))
    .with_status(ChallengeStatus::parse(&status).map_err(RepoError::serialization)?)
    .with_timestamps(parse_datetime(&created_at)?, parse_datetime(&updated_at)?))
}

#[async_trait]
impl ChallengeRepo for SqliteChallengeRepo {
    async fn get(&self, id: ChallengeId) -> Result<Option<Challenge>, RepoError> {
        let row = sqlx::query("SELECT * FROM challenges WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("challenge.get", e))?;

        row.as_ref().map(row_to_challenge).transpose()
    }

    async fn save(&self, challenge: &Challenge) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO challenges (id, type, target, points, description, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                type = excluded.type,
                target = excluded.target,
                points = excluded.points,
                description = excluded.description,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(challenge.id().to_string())
        .bind(challenge.challenge_type().as_str())
        .bind(challenge.target() as i64)
        .bind(challenge.points() as i64)
        .bind(challenge.description())
        .bind(challenge.status().as_str())
        .bind(challenge.created_at().to_rfc3339())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("challenge.save", e))?;

        Ok(())
    }

    async fn list_active(
        &self,
        page: u32,
        limit: u32,
        search: Option<String>,
    ) -> Result<Page<Challenge>, RepoError> {
        let pattern = search.map(|s| format!("%{s}%"));
        let offset = page.saturating_sub(1) * limit;

        let mut count_query =
            String::from("SELECT COUNT(*) AS n FROM challenges WHERE status = 'Active'");
        let mut list_query = String::from("SELECT * FROM challenges WHERE status = 'Active'");
        if pattern.is_some() {
            count_query.push_str(" AND description LIKE ?");
            list_query.push_str(" AND description LIKE ?");
        }
        list_query.push_str(" ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");

        let mut count = sqlx::query(&count_query);
        if let Some(ref pattern) = pattern {
            count = count.bind(pattern);
        }
        let total: i64 = count
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("challenge.list_active", e))?
            .get("n");

        let mut list = sqlx::query(&list_query);
        if let Some(ref pattern) = pattern {
            list = list.bind(pattern);
        }
        let rows = list
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("challenge.list_active", e))?;

        let docs = rows
            .iter()
            .map(row_to_challenge)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(docs, total as u64, page, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::persistence::test_pool;

    async fn repo() -> SqliteChallengeRepo {
        SqliteChallengeRepo::new(test_pool().await, Arc::new(SystemClock))
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let repo = repo().await;
        let challenge = Challenge::new(ChallengeType::Like, 20, 10, "like 20 products");
        repo.save(&challenge).await.expect("save");

        let loaded = repo
            .get(challenge.id())
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.id(), challenge.id());
        assert_eq!(loaded.challenge_type(), ChallengeType::Like);
        assert_eq!(loaded.target(), 20);
        assert_eq!(loaded.points(), 10);
    }

    #[tokio::test]
    async fn test_list_active_filters_and_searches() {
        let repo = repo().await;
        repo.save(&Challenge::new(ChallengeType::Like, 5, 5, "like five products"))
            .await
            .expect("save");
        repo.save(&Challenge::new(ChallengeType::Comment, 3, 5, "comment on three"))
            .await
            .expect("save");
        repo.save(
            &Challenge::new(ChallengeType::Like, 1, 1, "retired challenge")
                .with_status(ChallengeStatus::Inactive),
        )
        .await
        .expect("save");

        let all = repo.list_active(1, 20, None).await.expect("list");
        assert_eq!(all.total_docs, 2);

        let liked = repo
            .list_active(1, 20, Some("like".to_string()))
            .await
            .expect("list");
        assert_eq!(liked.total_docs, 1);
        assert_eq!(liked.docs[0].description(), "like five products");
    }
}
