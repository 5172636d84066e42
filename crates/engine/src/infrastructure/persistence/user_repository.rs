//! SQLite storage for users.
//!
//! The onboarding service owns writes in production; this repo mostly
//! serves authentication lookups and leaderboard display joins.

use std::sync::Arc;

use async_trait::async_trait;
use questboard_domain::{Role, User, UserId, UserStatus};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_datetime, parse_uuid};
use crate::infrastructure::ports::{ClockPort, RepoError, UserRepo};

pub struct SqliteUserRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, RepoError> {
    let id: String = row.get("id");
    let full_name: String = row.get("full_name");
    let email: String = row.get("email");
    let role: String = row.get("role");
    let status: String = row.get("status");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(User {
        id: UserId::from_uuid(parse_uuid(&id)?),
        full_name,
        email,
        role: Role::parse(&role).map_err(RepoError::serialization)?,
        status: UserStatus::parse(&status).map_err(RepoError::serialization)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("user.get", e))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn save(&self, user: &User) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO users (id, full_name, email, role, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                full_name = excluded.full_name,
                email = excluded.email,
                role = excluded.role,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(user.created_at.to_rfc3339())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("user.save", e))?;

        Ok(())
    }

    async fn get_many(&self, ids: Vec<UserId>) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!("SELECT * FROM users WHERE id IN ({placeholders})");

        let mut q = sqlx::query(&query);
        for id in &ids {
            q = q.bind(id.to_string());
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("user.get_many", e))?;

        rows.iter().map(row_to_user).collect()
    }
}
