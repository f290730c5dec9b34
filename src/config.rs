//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::ExpirationPolicy;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Sliding expiration window in seconds
    pub sliding_expiration_secs: u64,
    /// Absolute expiration ceiling in seconds
    pub absolute_expiration_secs: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds, 0 disables the sweep
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 10000)
    /// - `SLIDING_EXPIRATION_SECS` - Idle window in seconds (default: 300)
    /// - `ABSOLUTE_EXPIRATION_SECS` - Lifetime ceiling in seconds (default: 3600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            sliding_expiration_secs: env_or(
                "SLIDING_EXPIRATION_SECS",
                defaults.sliding_expiration_secs,
            ),
            absolute_expiration_secs: env_or(
                "ABSOLUTE_EXPIRATION_SECS",
                defaults.absolute_expiration_secs,
            ),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Expiration policy applied to every cached lookup.
    pub fn expiration_policy(&self) -> ExpirationPolicy {
        ExpirationPolicy::new(
            Duration::from_secs(self.sliding_expiration_secs),
            Duration::from_secs(self.absolute_expiration_secs),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            sliding_expiration_secs: ExpirationPolicy::DEFAULT_SLIDING.as_secs(),
            absolute_expiration_secs: ExpirationPolicy::DEFAULT_ABSOLUTE.as_secs(),
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}

/// Parses `name` from the environment, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
