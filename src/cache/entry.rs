//! Cache Entry Module
//!
//! Defines individual cache entries and the two-timer expiration policy.

use std::time::{Duration, Instant};

// == Expiration Policy ==
/// Sliding and absolute expiration windows applied to a single entry.
///
/// An entry dies when it has gone unread for `sliding`, or when `absolute`
/// has passed since it was stored, whichever happens first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    /// Idle period after which an unread entry expires
    pub sliding: Duration,
    /// Hard ceiling measured from the time the entry was stored
    pub absolute: Duration,
}

impl ExpirationPolicy {
    /// Sliding window used when nothing else is configured (5 minutes).
    pub const DEFAULT_SLIDING: Duration = Duration::from_secs(5 * 60);
    /// Absolute ceiling used when nothing else is configured (1 hour).
    pub const DEFAULT_ABSOLUTE: Duration = Duration::from_secs(60 * 60);

    pub fn new(sliding: Duration, absolute: Duration) -> Self {
        Self { sliding, absolute }
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SLIDING, Self::DEFAULT_ABSOLUTE)
    }
}

// == Cache Entry ==
/// A stored value together with its policy and access timestamps.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration windows for this entry
    pub policy: ExpirationPolicy,
    /// When the entry was stored
    pub created_at: Instant,
    /// When the entry was last stored or successfully read
    pub last_access: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry whose timers both start now.
    pub fn new(value: V, policy: ExpirationPolicy) -> Self {
        let now = Instant::now();
        Self {
            value,
            policy,
            created_at: now,
            last_access: now,
        }
    }

    // == Is Expired ==
    /// Checks both timers against `now`.
    ///
    /// Boundary condition: an entry is expired once the elapsed time is
    /// greater than or equal to the window, so a zero-length window expires
    /// immediately.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        let idle = now.saturating_duration_since(self.last_access);
        let age = now.saturating_duration_since(self.created_at);
        idle >= self.policy.sliding || age >= self.policy.absolute
    }

    /// Checks both timers against the current instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Touch ==
    /// Resets the sliding timer. The absolute deadline is unaffected.
    pub fn touch(&mut self, now: Instant) {
        self.last_access = now;
    }
}
