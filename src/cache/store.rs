//! Cache Store Module
//!
//! Sharded concurrent map with lazy two-timer expiration.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::cache::{CacheEntry, CacheStats, ExpirationPolicy, StatsRecorder, MAX_KEY_LENGTH};
use crate::error::{CacheError, CacheResult};

// == Cache Store ==
/// Thread-safe key/value store where every entry carries its own expiration policy.
///
/// Entries live in a [`DashMap`], so operations on unrelated keys lock
/// different shards and never serialize behind one another. Expired entries
/// are dropped the next time they are read, or by [`CacheStore::cleanup_expired`].
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: DashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: StatsRecorder,
    /// Slots claimed by stored entries; never below the map's length
    occupied: AtomicUsize,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            stats: StatsRecorder::new(),
            occupied: AtomicUsize::new(0),
            max_entries,
        }
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`.
    ///
    /// A hit resets the entry's sliding timer. Expired entries are removed
    /// and reported as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();

        match self.entries.get_mut(key) {
            Some(mut entry) if !entry.is_expired_at(now) => {
                entry.touch(now);
                self.stats.record_hit();
                return Some(entry.value.clone());
            }
            Some(_) => {}
            None => {
                self.stats.record_miss();
                return None;
            }
        }

        // The shard guard is released here; a concurrent `set` may have
        // replaced the entry in between, so only drop it if still expired.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired_at(now))
            .is_some()
        {
            self.release_slots(1);
            self.stats.record_expirations(1);
        }
        self.stats.record_miss();
        None
    }

    // == Set ==
    /// Stores `value` under `key`, overwriting any previous entry.
    ///
    /// Both timers restart from the moment of the call. When inserting a new
    /// key into a full store, expired entries are swept first; if the store
    /// is still full the value is rejected.
    pub fn set(&self, key: impl Into<String>, value: V, policy: ExpirationPolicy) -> CacheResult<()> {
        let key = key.into();

        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        let entry = CacheEntry::new(value, policy);
        let (key, entry) = match self.insert_within_capacity(key, entry) {
            Ok(()) => return Ok(()),
            Err(rejected) => rejected,
        };

        // Sweeping locks every shard, so it runs with no entry guard held
        self.cleanup_expired();
        match self.insert_within_capacity(key, entry) {
            Ok(()) => Ok(()),
            Err((key, _)) => Err(CacheError::CacheFull(format!(
                "Cache holds {} entries, refusing '{}'",
                self.max_entries, key
            ))),
        }
    }

    /// Overwrites an existing key, or claims a free slot for a new one while
    /// the key's shard is locked. Hands the key and entry back when full.
    fn insert_within_capacity(
        &self,
        key: String,
        entry: CacheEntry<V>,
    ) -> Result<(), (String, CacheEntry<V>)> {
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(entry);
            }
            Entry::Vacant(vacant) => {
                let reserved = self
                    .occupied
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                        (n < self.max_entries).then_some(n + 1)
                    })
                    .is_ok();
                if !reserved {
                    return Err((vacant.into_key(), entry));
                }
                vacant.insert(entry);
            }
        }

        self.stats.record_set();
        Ok(())
    }

    fn release_slots(&self, count: usize) {
        if count > 0 {
            self.occupied.fetch_sub(count, Ordering::AcqRel);
        }
    }

    // == Remove ==
    /// Deletes the entry under `key`.
    ///
    /// Returns `true` if an entry was present. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.release_slots(1);
            self.stats.record_removal();
        }
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let expired = entry.is_expired_at(now);
            removed += usize::from(expired);
            !expired
        });

        self.release_slots(removed);
        self.stats.record_expirations(removed as u64);
        removed
    }

    // == Length ==
    /// Returns the current number of entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Contains ==
    /// Checks whether a live entry exists without touching its timers or the stats.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }
}
