//! API Module
//!
//! HTTP handlers and routing in front of the product lookup service.
//!
//! # Endpoints
//! - `GET /products/:id` - Fetch one product
//! - `GET /products` - List products by optional `categoryId` and `maxPrice`
//! - `PUT /products/:id` - Replace a product and evict its cached copy
//! - `DELETE /products/:id/cache` - Evict a cached product
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
