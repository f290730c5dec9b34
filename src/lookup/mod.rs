//! Lookup Module
//!
//! Cache-aside reads of products by id and by filter, plus explicit invalidation.

pub mod keys;
mod service;


pub use service::{CachedValue, ProductLookupService};
