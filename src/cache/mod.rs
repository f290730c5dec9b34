//! Cache Module
//!
//! Provides an in-process concurrent cache with sliding and absolute expiration.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, ExpirationPolicy};
pub use stats::{CacheStats, StatsRecorder};
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
