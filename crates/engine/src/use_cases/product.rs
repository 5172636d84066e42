//! Product creation.

use std::sync::Arc;

use questboard_domain::Product;

use crate::infrastructure::ports::{ProductRepo, RepoError};
use crate::use_cases::validation::{self, ValidationError};

pub struct ProductOps {
    products: Arc<dyn ProductRepo>,
}

impl ProductOps {
    pub fn new(products: Arc<dyn ProductRepo>) -> Self {
        Self { products }
    }

    pub async fn create(&self, name: String) -> Result<Product, ProductError> {
        validation::require_non_empty(&name, "name")?;

        let product = Product::new(name);
        self.products.save(&product).await?;
        Ok(product)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
