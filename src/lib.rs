//! Product Cache - A cache-aside product lookup service
//!
//! Serves repeated product reads from an in-process cache with sliding and
//! absolute expiration, falling back to the data store on miss.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use lookup::ProductLookupService;
pub use tasks::spawn_cleanup_task;
