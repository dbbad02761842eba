//! Backing store contract.
//!
//! A store is a bounded, thread-safe key/value container with hit/miss
//! accounting. The capability tiers are written against this contract, so any
//! engine (the bundled clock store, or an adapter over some other concurrent
//! map) plugs in behind them. The eviction policy is the store's own
//! business: the only requirements are that eviction never surfaces a value
//! that was not legitimately stored, and that it is safe to run concurrently
//! with any other operation.

use std::sync::Arc;

/// Snapshot of store-level counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreMetrics {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub updates: u64,
    pub evictions: u64,
}

impl StoreMetrics {
    /// Total lookups, hit or miss.
    #[inline]
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }
}

/// Bounded, thread-safe key/value store with interior mutability.
///
/// All operations take `&self`; implementations synchronize internally. An
/// entry observed by `get` may be evicted a moment later, so callers must not
/// assume presence is stable between calls.
pub trait ConcurrentStore<K, V>: Send + Sync {
    /// Fetches a value by key, recording a hit or a miss.
    fn get(&self, key: &K) -> Option<Arc<V>>;

    /// Checks for a key without touching access state or counters.
    fn contains(&self, key: &K) -> bool;

    /// Inserts or overwrites an entry, returning the previous value if the
    /// key was present.
    ///
    /// A store at capacity evicts according to its own policy to make room;
    /// insertion itself never fails.
    fn insert(&self, key: K, value: Arc<V>) -> Option<Arc<V>>;

    /// Drops every entry.
    ///
    /// Concurrent readers observe the old or the new entry set for any single
    /// key, never a mixture. Cumulative counters are unaffected.
    fn clear(&self);

    /// Current number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum entries the store will hold.
    fn capacity(&self) -> usize;

    /// Snapshots the store's counters.
    fn metrics(&self) -> StoreMetrics;
}
