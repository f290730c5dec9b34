//! Catalog Module
//!
//! Product records and the data access boundary the lookup service reads through.

mod memory;
mod product;
mod repository;

pub use memory::InMemoryProductRepository;
pub use product::{Product, ProductFilter};
pub use repository::ProductRepository;
