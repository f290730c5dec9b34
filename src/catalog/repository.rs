//! Data access boundary for product records.

use async_trait::async_trait;

use crate::catalog::{Product, ProductFilter};
use crate::error::RepositoryResult;

/// Source of truth for products.
///
/// Implementations may block on I/O; callers never hold a cache lock across
/// these calls.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fetches one product, or `None` when no record has this id.
    async fn fetch_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;

    /// Fetches every product matching `filter`, in the store's natural order.
    ///
    /// Returns an empty vector, not an error, when nothing matches.
    async fn fetch_by_filter(&self, filter: ProductFilter) -> RepositoryResult<Vec<Product>>;

    /// Inserts or replaces a product and returns the stored record.
    async fn save(&self, product: Product) -> RepositoryResult<Product>;
}
