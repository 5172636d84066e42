//! SQLite storage for products.
//!
//! Likes and comments are applied with single-statement updates so that
//! concurrent progress calls from different users cannot lose each other's
//! writes.

use std::sync::Arc;

use async_trait::async_trait;
use questboard_domain::{Product, ProductId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{parse_datetime, parse_uuid};
use crate::infrastructure::ports::{ClockPort, ProductRepo, RepoError};

pub struct SqliteProductRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteProductRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn row_to_product(row: &SqliteRow) -> Result<Product, RepoError> {
    let id: String = row.get("id");
    let name: String = row.get("name");
    let like_count: i64 = row.get("like_count");
    let comments: String = row.get("comments");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    let comments: Vec<String> =
        serde_json::from_str(&comments).map_err(RepoError::serialization)?;

    Ok(Product::new(name)
        .with_id(ProductId::from_uuid(parse_uuid(&id)?))
        .with_like_count(like_count as u32)
        .with_comments(comments)
        .with_timestamps(parse_datetime(&created_at)?, parse_datetime(&updated_at)?))
}

#[async_trait]
impl ProductRepo for SqliteProductRepo {
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepoError> {
        let row = sqlx::query("SELECT * FROM products WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("product.get", e))?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn save(&self, product: &Product) -> Result<(), RepoError> {
        let comments =
            serde_json::to_string(product.comments()).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO products (id, name, like_count, comments, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                like_count = excluded.like_count,
                comments = excluded.comments,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(product.id().to_string())
        .bind(product.name())
        .bind(product.like_count() as i64)
        .bind(comments)
        .bind(product.created_at().to_rfc3339())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("product.save", e))?;

        Ok(())
    }

    async fn increment_likes(&self, id: ProductId) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE products SET like_count = like_count + 1, updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("product.increment_likes", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Product", id));
        }
        Ok(())
    }

    async fn append_comment(&self, id: ProductId, comment: String) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        // json_insert with '$[#]' appends to the end of the array in place.
        let result = sqlx::query(
            "UPDATE products SET comments = json_insert(comments, '$[#]', ?), updated_at = ? WHERE id = ?",
        )
        .bind(comment)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("product.append_comment", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Product", id));
        }
        Ok(())
    }
}
