//! In-memory product repository used by the service binary and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::catalog::{Product, ProductFilter, ProductRepository};
use crate::error::{RepositoryError, RepositoryResult};

// == In-Memory Repository ==
/// Product table held in a `BTreeMap`, so listings come back in id order.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<BTreeMap<i64, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `products`.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products.into_iter().map(|p| (p.id, p)).collect();
        Self {
            products: RwLock::new(products),
        }
    }

    /// A small catalogue spread over three categories.
    pub fn seeded() -> Self {
        Self::with_products([
            Product::new(1, 1, 9.99, "Notebook"),
            Product::new(2, 1, 24.50, "Fountain Pen"),
            Product::new(3, 2, 79.00, "Desk Lamp"),
            Product::new(4, 2, 149.00, "Office Chair"),
            Product::new(5, 2, 35.00, "Monitor Stand"),
            Product::new(6, 3, 4.25, "Sticky Notes"),
            Product::new(42, 1, 9.99, "Pocket Planner"),
        ])
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn fetch_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        debug!(id, "Fetching product from repository");
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn fetch_by_filter(&self, filter: ProductFilter) -> RepositoryResult<Vec<Product>> {
        debug!(?filter, "Fetching filtered products from repository");
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    /// Upserts `product`. Prices must be finite and non-negative.
    async fn save(&self, product: Product) -> RepositoryResult<Product> {
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(RepositoryError::Malformed(format!(
                "product {} has unusable price {}",
                product.id, product.price
            )));
        }

        debug!(id = product.id, "Saving product to repository");
        self.products
            .write()
            .await
            .insert(product.id, product.clone());
        Ok(product)
    }
}
