//! API Handlers
//!
//! HTTP request handlers mapping each endpoint onto the lookup service.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::CacheStore;
use crate::catalog::{Product, ProductRepository};
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::lookup::{keys, ProductLookupService};
use crate::models::{
    HealthResponse, InvalidateResponse, ProductQuery, StatsResponse, UpdateProductRequest,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside product lookups
    pub lookup: Arc<ProductLookupService>,
}

impl AppState {
    /// Creates a new AppState around an existing service.
    pub fn new(lookup: ProductLookupService) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds a fresh cache store sized and timed by the Config.
    pub fn from_config(config: &Config, repository: Arc<dyn ProductRepository>) -> Self {
        let cache = Arc::new(CacheStore::new(config.max_entries));
        let lookup =
            ProductLookupService::new(cache, repository).with_policy(config.expiration_policy());
        Self::new(lookup)
    }
}

/// Handler for GET /products/:id
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    state
        .lookup
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or(ServiceError::NotFound(id))
}

/// Handler for GET /products?categoryId=&maxPrice=
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    if let Some(error_msg) = query.validate() {
        return Err(ServiceError::InvalidRequest(error_msg));
    }

    let products = state
        .lookup
        .get_by_filter(query.category_id, query.max_price)
        .await?;

    Ok(Json(products))
}

/// Handler for PUT /products/:id
///
/// Stores the new record, then evicts the cached copy for this id.
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Product>> {
    if let Some(error_msg) = req.validate() {
        return Err(ServiceError::InvalidRequest(error_msg));
    }

    let saved = state.lookup.update_product(req.into_product(id)).await?;

    Ok(Json(saved))
}

/// Handler for DELETE /products/:id/cache
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<InvalidateResponse> {
    state.lookup.invalidate(id);

    Json(InvalidateResponse::new(keys::product_by_id(id)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.lookup.stats().into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
