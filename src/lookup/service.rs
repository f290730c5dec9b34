//! Product Lookup Service
//!
//! Cache-aside reads over a [`ProductRepository`].

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore, ExpirationPolicy};
use crate::catalog::{Product, ProductFilter, ProductRepository};
use crate::error::Result;
use crate::lookup::keys;

// == Cached Value ==
/// Shapes stored in the product cache.
///
/// By-id keys hold [`CachedValue::Product`] and filter keys hold
/// [`CachedValue::ProductList`]; a shape mismatch is treated as a miss and
/// the value is refetched and overwritten.
///
/// The store counts hits without looking at the shape, so a mismatched read
/// still shows up as a hit in [`CacheStats`].
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Product(Product),
    ProductList(Vec<Product>),
}

// == Lookup Service ==
/// Serves product reads from the cache and falls back to the repository on miss.
///
/// Holds no state of its own beyond shared handles to the cache and the
/// repository. Concurrent misses on the same key each query the repository
/// and the last write wins.
pub struct ProductLookupService {
    cache: Arc<CacheStore<CachedValue>>,
    repository: Arc<dyn ProductRepository>,
    policy: ExpirationPolicy,
}

impl ProductLookupService {
    /// Creates a service using the default expiration policy
    /// (5 minute sliding window, 1 hour absolute ceiling).
    pub fn new(cache: Arc<CacheStore<CachedValue>>, repository: Arc<dyn ProductRepository>) -> Self {
        Self {
            cache,
            repository,
            policy: ExpirationPolicy::default(),
        }
    }

    /// Overrides the policy applied to every entry this service creates.
    pub fn with_policy(mut self, policy: ExpirationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ExpirationPolicy {
        self.policy
    }

    pub fn cache(&self) -> &Arc<CacheStore<CachedValue>> {
        &self.cache
    }

    // == Get By Id ==
    /// Returns the product with `id`, or `None` if the repository has no such record.
    ///
    /// Absence is never cached: every call for a missing id reaches the repository.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Product>> {
        let cache_key = keys::product_by_id(id);

        if let Some(CachedValue::Product(product)) = self.cache.get(&cache_key) {
            debug!(key = %cache_key, "Cache hit for product");
            return Ok(Some(product));
        }

        debug!(key = %cache_key, "Cache miss for product");
        let product = self.repository.fetch_by_id(id).await?;

        if let Some(product) = &product {
            self.store(cache_key, CachedValue::Product(product.clone()));
        }

        Ok(product)
    }

    // == Get By Filter ==
    /// Returns the products matching the optional category and maximum price.
    ///
    /// The listing keeps the repository's order. Empty listings are cached
    /// like any other result.
    pub async fn get_by_filter(
        &self,
        category_id: Option<i64>,
        max_price: Option<f64>,
    ) -> Result<Vec<Product>> {
        let filter = ProductFilter::new(category_id, max_price);
        let cache_key = keys::products_by_filter(&filter);

        if let Some(CachedValue::ProductList(products)) = self.cache.get(&cache_key) {
            debug!(key = %cache_key, count = products.len(), "Cache hit for product listing");
            return Ok(products);
        }

        debug!(key = %cache_key, "Cache miss for product listing");
        let products = self.repository.fetch_by_filter(filter).await?;

        self.store(cache_key, CachedValue::ProductList(products.clone()));

        Ok(products)
    }

    // == Invalidate ==
    /// Evicts the by-id entry for `id`.
    ///
    /// Filter listings that contain this product are left alone and may
    /// serve the old record until they expire. Evicting an uncached id is a no-op.
    pub fn invalidate(&self, id: i64) {
        let cache_key = keys::product_by_id(id);
        if self.cache.remove(&cache_key) {
            info!(key = %cache_key, "Invalidated cached product");
        } else {
            debug!(key = %cache_key, "Nothing cached to invalidate");
        }
    }

    // == Update Product ==
    /// Writes `product` to the repository, then evicts its by-id entry.
    ///
    /// A failed write leaves the cache untouched.
    pub async fn update_product(&self, product: Product) -> Result<Product> {
        let saved = self.repository.save(product).await?;
        self.invalidate(saved.id);
        Ok(saved)
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Stores a freshly fetched value. The cache is only an optimization, so
    /// a rejected write is logged and otherwise ignored.
    fn store(&self, cache_key: String, value: CachedValue) {
        if let Err(err) = self.cache.set(cache_key.clone(), value, self.policy) {
            warn!(key = %cache_key, error = %err, "Failed to cache lookup result");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::catalog::InMemoryProductRepository;
    use crate::error::{RepositoryError, RepositoryResult, ServiceError};

    /// Repository wrapper counting calls that reach the data store.
    #[derive(Default)]
    struct CountingRepository {
        inner: InMemoryProductRepository,
        by_id_calls: AtomicUsize,
        by_filter_calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl CountingRepository {
        fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
            Self {
                inner: InMemoryProductRepository::with_products(products),
                ..Default::default()
            }
        }

        fn by_id_calls(&self) -> usize {
            self.by_id_calls.load(Ordering::SeqCst)
        }

        fn by_filter_calls(&self) -> usize {
            self.by_filter_calls.load(Ordering::SeqCst)
        }

        fn set_failing(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        fn check(&self) -> RepositoryResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                Err(RepositoryError::Unavailable("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ProductRepository for CountingRepository {
        async fn fetch_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
            self.by_id_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            self.inner.fetch_by_id(id).await
        }

        async fn fetch_by_filter(&self, filter: ProductFilter) -> RepositoryResult<Vec<Product>> {
            self.by_filter_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            self.inner.fetch_by_filter(filter).await
        }

        async fn save(&self, product: Product) -> RepositoryResult<Product> {
            self.check()?;
            self.inner.save(product).await
        }
    }

    fn setup(products: Vec<Product>) -> (ProductLookupService, Arc<CountingRepository>) {
        setup_with_capacity(products, 1_000)
    }

    fn setup_with_capacity(
        products: Vec<Product>,
        max_entries: usize,
    ) -> (ProductLookupService, Arc<CountingRepository>) {
        let repo = Arc::new(CountingRepository::with_products(products));
        let cache = Arc::new(CacheStore::new(max_entries));
        let service = ProductLookupService::new(cache, repo.clone());
        (service, repo)
    }

    fn catalogue() -> Vec<Product> {
        vec![
            Product::new(1, 1, 9.99, "a"),
            Product::new(2, 2, 50.0, "b"),
            Product::new(3, 2, 150.0, "c"),
            Product::new(42, 1, 9.99, "d"),
        ]
    }

    #[tokio::test]
    async fn test_get_by_id_populates_cache() {
        let (service, repo) = setup(catalogue());

        let first = service.get_by_id(42).await.unwrap();
        let second = service.get_by_id(42).await.unwrap();

        let expected = Product::new(42, 1, 9.99, "d");
        assert_eq!(first, Some(expected.clone()));
        assert_eq!(second, Some(expected.clone()));
        assert_eq!(repo.by_id_calls(), 1);
        assert_eq!(
            service.cache().get("product-42"),
            Some(CachedValue::Product(expected))
        );
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_is_not_cached() {
        let (service, repo) = setup(catalogue());

        assert!(service.get_by_id(999).await.unwrap().is_none());
        assert!(service.get_by_id(999).await.unwrap().is_none());

        assert_eq!(repo.by_id_calls(), 2);
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_sees_record_once_it_appears() {
        let (service, repo) = setup(Vec::new());

        assert!(service.get_by_id(7).await.unwrap().is_none());
        repo.inner.save(Product::new(7, 1, 1.0, "late")).await.unwrap();

        assert!(service.get_by_id(7).await.unwrap().is_some());
        assert_eq!(repo.by_id_calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_one_fresh_fetch() {
        let (service, repo) = setup(catalogue());

        service.get_by_id(1).await.unwrap();
        service.invalidate(1);
        service.get_by_id(1).await.unwrap();
        service.get_by_id(1).await.unwrap();

        assert_eq!(repo.by_id_calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_uncached_is_noop() {
        let (service, repo) = setup(catalogue());

        service.invalidate(12345);
        service.invalidate(12345);

        assert_eq!(repo.by_id_calls(), 0);
        assert_eq!(service.stats().removals, 0);
    }

    #[tokio::test]
    async fn test_get_by_filter_caches_listing() {
        let (service, repo) = setup(catalogue());

        let first = service.get_by_filter(Some(2), None).await.unwrap();
        let second = service.get_by_filter(Some(2), None).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(repo.by_filter_calls(), 1);
    }

    #[tokio::test]
    async fn test_get_by_filter_distinct_keys() {
        let (service, repo) = setup(catalogue());

        let all = service.get_by_filter(Some(2), None).await.unwrap();
        let cheap = service.get_by_filter(Some(2), Some(100.0)).await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(cheap.len(), 1);
        assert_eq!(repo.by_filter_calls(), 2);
        assert!(service.cache().contains_key("products-filter-2-any"));
        assert!(service.cache().contains_key("products-filter-2-100"));
    }

    #[tokio::test]
    async fn test_empty_filter_result_is_cached() {
        let (service, repo) = setup(catalogue());

        assert!(service.get_by_filter(Some(99), None).await.unwrap().is_empty());
        assert!(service.get_by_filter(Some(99), None).await.unwrap().is_empty());

        assert_eq!(repo.by_filter_calls(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_leaves_filter_entries_stale() {
        let (service, _repo) = setup(catalogue());

        let before = service.get_by_filter(Some(1), None).await.unwrap();
        service
            .update_product(Product::new(1, 1, 19.99, "a"))
            .await
            .unwrap();

        // By-id read sees the new price
        let fresh = service.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(fresh.price, 19.99);

        // Listing still serves what it cached before the write
        let after = service.get_by_filter(Some(1), None).await.unwrap();
        assert_eq!(before, after);
        assert_eq!(after[0].price, 9.99);
    }

    #[tokio::test]
    async fn test_data_access_failure_propagates_and_leaves_cache_untouched() {
        let (service, repo) = setup(catalogue());
        repo.set_failing(true);

        let err = service.get_by_id(1).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::DataAccess(RepositoryError::Unavailable(_))
        ));

        let err = service.get_by_filter(None, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::DataAccess(_)));

        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_cached_entry() {
        let (service, repo) = setup(catalogue());

        service.get_by_id(1).await.unwrap();
        repo.set_failing(true);

        assert!(service
            .update_product(Product::new(1, 1, 0.5, "a"))
            .await
            .is_err());
        assert!(service.cache().contains_key("product-1"));
    }

    #[tokio::test]
    async fn test_rejected_update_keeps_cached_entry() {
        let (service, repo) = setup(catalogue());

        service.get_by_id(1).await.unwrap();

        let err = service
            .update_product(Product::new(1, 1, f64::NAN, "a"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::DataAccess(RepositoryError::Malformed(_))
        ));

        let cached = service.get_by_id(1).await.unwrap();
        assert_eq!(cached.map(|p| p.price), Some(9.99));
        assert_eq!(repo.by_id_calls(), 1);
    }

    #[tokio::test]
    async fn test_mismatched_shape_is_refetched() {
        let (service, repo) = setup(catalogue());
        service
            .cache()
            .set(
                "product-1",
                CachedValue::ProductList(Vec::new()),
                ExpirationPolicy::default(),
            )
            .unwrap();

        let product = service.get_by_id(1).await.unwrap();

        assert_eq!(product.map(|p| p.id), Some(1));
        assert_eq!(repo.by_id_calls(), 1);
        assert!(matches!(
            service.cache().get("product-1"),
            Some(CachedValue::Product(_))
        ));

        // The store saw a live entry on the first read, whatever its shape
        let stats = service.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn test_full_cache_still_returns_fetched_value() {
        let (service, repo) = setup_with_capacity(catalogue(), 1);

        service.get_by_id(1).await.unwrap();
        let product = service.get_by_id(2).await.unwrap();

        assert_eq!(product.map(|p| p.id), Some(2));
        assert!(!service.cache().contains_key("product-2"));

        service.get_by_id(2).await.unwrap();
        assert_eq!(repo.by_id_calls(), 3);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let (service, repo) = setup(catalogue());
        let service = service.with_policy(ExpirationPolicy::new(
            Duration::from_millis(50),
            Duration::from_secs(60),
        ));

        service.get_by_id(1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        service.get_by_id(1).await.unwrap();

        assert_eq!(repo.by_id_calls(), 2);
    }

    #[tokio::test]
    async fn test_default_policy() {
        let (service, _repo) = setup(Vec::new());

        assert_eq!(service.policy().sliding, Duration::from_secs(300));
        assert_eq!(service.policy().absolute, Duration::from_secs(3600));
    }

    #[tokio::test]
    async fn test_concurrent_misses_all_succeed() {
        let (service, repo) = setup(catalogue());
        let service = Arc::new(service);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.get_by_id(42).await })
            })
            .collect();

        for handle in handles {
            let product = handle.await.unwrap().unwrap();
            assert_eq!(product.map(|p| p.id), Some(42));
        }

        // No coalescing: anywhere from one to sixteen fetches is allowed
        let calls = repo.by_id_calls();
        assert!((1..=16).contains(&calls));
        assert_eq!(service.cache().len(), 1);
    }
}
