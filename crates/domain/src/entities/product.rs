//! Product entity - the target of Like/Comment challenge actions.
//!
//! Like counts only ever grow and comments are append-only; the entity
//! exposes the two mutations and nothing else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// A product users interact with while progressing challenges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    like_count: u32,
    comments: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            name: name.into(),
            like_count: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn like_count(&self) -> u32 {
        self.like_count
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // === Mutations ===

    /// Count one like. Monotonically non-decreasing.
    pub fn record_like(&mut self) {
        self.like_count += 1;
    }

    /// Append one comment in call order. No de-duplication, no emptiness
    /// check: the comment text is stored as submitted.
    pub fn record_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
    }

    // === Builder Methods (store loading) ===

    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = id;
        self
    }

    pub fn with_like_count(mut self, like_count: u32) -> Self {
        self.like_count = like_count;
        self
    }

    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_starts_empty() {
        let product = Product::new("Product A");
        assert_eq!(product.like_count(), 0);
        assert!(product.comments().is_empty());
    }

    #[test]
    fn test_comments_keep_call_order() {
        let mut product = Product::new("Product A");
        product.record_comment("x");
        product.record_comment("y");
        product.record_comment("z");
        assert_eq!(product.comments(), ["x", "y", "z"]);
    }

    #[test]
    fn test_duplicate_and_empty_comments_are_kept() {
        let mut product = Product::new("Product A");
        product.record_comment("same");
        product.record_comment("same");
        product.record_comment("");
        assert_eq!(product.comments().len(), 3);
    }
}
