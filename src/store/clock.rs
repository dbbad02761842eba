//! Sharded clock (second-chance) store.
//!
//! The bundled [`ConcurrentStore`] engine: entries are spread across
//! independently locked shards, and each shard keeps its entries in a fixed
//! ring of slots swept by a clock hand on eviction.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ ShardedClockStore<K, V>                                          │
//! │                                                                  │
//! │   key ──ShardSelector──► shard i                                 │
//! │                                                                  │
//! │   ┌─ RwLock<ClockShard> ─────────────────────────────────────┐   │
//! │   │  index: FxHashMap<K, usize>      (key -> slot)           │   │
//! │   │  slots: Vec<Option<Slot>>        (bounded ring)          │   │
//! │   │  hand:  usize                    (eviction sweep)        │   │
//! │   └──────────────────────────────────────────────────────────┘   │
//! │                                                                  │
//! │   counters: hits/misses/inserts/updates/evictions (AtomicU64)    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Eviction
//!
//! A slot's reference bit is set on every hit and cleared by the sweeping
//! hand. Inserting into a full shard advances the hand, clearing bits as it
//! goes, and evicts the first slot found unreferenced; recently hit entries
//! get a second chance. Fresh inserts start unreferenced, so an entry that is
//! written but never read back is first in line when space runs out.
//!
//! ## Locking
//!
//! Reference bits are `AtomicBool`, so the hit path runs entirely under a
//! shard read lock; only inserts and `clear` take a write lock. `clear`
//! acquires every shard writer before dropping anything, so a concurrent
//! reader sees the old or the new entry set for any single key, never a
//! mixture.
//!
//! ## Capacity
//!
//! The bound is enforced per shard: the requested capacity is divided across
//! shards, rounded up, and [`capacity`](ConcurrentStore::capacity) reports
//! the resulting effective bound (a multiple of the shard count).

use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::store::shard::ShardSelector;
use crate::store::traits::{ConcurrentStore, StoreMetrics};

/// Store-level counters, updated with relaxed atomics.
#[derive(Debug, Default)]
struct StoreCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    updates: AtomicU64,
    evictions: AtomicU64,
}

impl StoreCounters {
    fn snapshot(&self) -> StoreMetrics {
        StoreMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn inc_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_update(&self) {
        self.updates.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }
}

/// One occupied ring slot.
///
/// The reference bit is atomic so hits can set it under a shard read lock.
struct Slot<K, V> {
    key: K,
    value: Arc<V>,
    referenced: AtomicBool,
}

/// One shard: a bounded slot ring plus its key index and clock hand.
struct ClockShard<K, V> {
    index: FxHashMap<K, usize>,
    slots: Vec<Option<Slot<K, V>>>,
    free: Vec<usize>,
    hand: usize,
}

impl<K, V> ClockShard<K, V>
where
    K: Clone + Eq + Hash,
{
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            index: FxHashMap::default(),
            slots: (0..capacity).map(|_| None).collect(),
            free: (0..capacity).rev().collect(),
            hand: 0,
        }
    }

    /// Shared-lock lookup; a hit sets the reference bit.
    fn get(&self, key: &K) -> Option<Arc<V>> {
        let idx = *self.index.get(key)?;
        match &self.slots[idx] {
            Some(slot) => {
                slot.referenced.store(true, Ordering::Relaxed);
                Some(Arc::clone(&slot.value))
            }
            None => None,
        }
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or overwrites. Returns the previous value and whether an
    /// eviction made room for a new entry.
    fn insert(&mut self, key: K, value: Arc<V>) -> (Option<Arc<V>>, bool) {
        if let Some(&idx) = self.index.get(&key) {
            if let Some(slot) = self.slots[idx].as_mut() {
                slot.referenced.store(true, Ordering::Relaxed);
                let previous = std::mem::replace(&mut slot.value, value);
                return (Some(previous), false);
            }
        }

        let mut evicted = false;
        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => {
                evicted = true;
                self.evict()
            }
        };
        self.slots[idx] = Some(Slot {
            key: key.clone(),
            value,
            referenced: AtomicBool::new(false),
        });
        self.index.insert(key, idx);
        (None, evicted)
    }

    /// Sweeps the hand until an unreferenced slot is found, clearing
    /// reference bits on the way. Only called with every slot occupied, so
    /// the sweep terminates within two revolutions.
    fn evict(&mut self) -> usize {
        let capacity = self.slots.len();
        loop {
            let idx = self.hand;
            self.hand = (self.hand + 1) % capacity;
            let victim = match &self.slots[idx] {
                Some(slot) => !slot.referenced.swap(false, Ordering::Relaxed),
                None => false,
            };
            if victim {
                if let Some(slot) = self.slots[idx].take() {
                    self.index.remove(&slot.key);
                }
                return idx;
            }
        }
    }

    fn clear(&mut self) {
        self.index.clear();
        for slot in &mut self.slots {
            *slot = None;
        }
        self.free = (0..self.slots.len()).rev().collect();
        self.hand = 0;
    }
}

/// Sharded, bounded store with clock eviction.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use uacache::store::{ConcurrentStore, ShardedClockStore};
///
/// let store: ShardedClockStore<u64, String> = ShardedClockStore::new(100, 4);
/// store.insert(1, Arc::new("node".to_string()));
///
/// assert_eq!(store.get(&1).as_deref(), Some(&"node".to_string()));
/// assert_eq!(store.len(), 1);
/// ```
pub struct ShardedClockStore<K, V> {
    shards: Vec<RwLock<ClockShard<K, V>>>,
    selector: ShardSelector,
    capacity: usize,
    size: AtomicUsize,
    counters: StoreCounters,
}

impl<K, V> ShardedClockStore<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates a store with the given capacity spread over `shards` shards.
    ///
    /// Degenerate parameters are clamped to 1, and the capacity is rounded up
    /// to a multiple of the shard count.
    pub fn new(capacity: usize, shards: usize) -> Self {
        Self::with_seed(capacity, shards, 0)
    }

    /// Creates a store whose shard selection uses the given seed.
    pub fn with_seed(capacity: usize, shards: usize, seed: u64) -> Self {
        let selector = ShardSelector::new(shards, seed);
        let shard_count = selector.shard_count();
        let per_shard = capacity.max(1).div_ceil(shard_count);
        let shards = (0..shard_count)
            .map(|_| RwLock::new(ClockShard::new(per_shard)))
            .collect();
        Self {
            shards,
            selector,
            capacity: per_shard * shard_count,
            size: AtomicUsize::new(0),
            counters: StoreCounters::default(),
        }
    }

    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

impl<K, V> ConcurrentStore<K, V> for ShardedClockStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    /// Fetches a value by key, recording a hit or a miss.
    fn get(&self, key: &K) -> Option<Arc<V>> {
        let shard = &self.shards[self.selector.shard_for_key(key)];
        match shard.read().get(key) {
            Some(value) => {
                self.counters.inc_hit();
                Some(value)
            }
            None => {
                self.counters.inc_miss();
                None
            }
        }
    }

    /// Checks for a key without touching reference bits or counters.
    fn contains(&self, key: &K) -> bool {
        let shard = &self.shards[self.selector.shard_for_key(key)];
        shard.read().contains(key)
    }

    /// Inserts or overwrites an entry, evicting within the target shard when
    /// it is full.
    fn insert(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        let idx = self.selector.shard_for_key(&key);
        let (previous, evicted) = {
            let mut shard = self.shards[idx].write();
            let (previous, evicted) = shard.insert(key, value);
            // Size moves under the shard lock so a concurrent clear, which
            // holds every shard writer, cannot interleave and leave the
            // aggregate count drifted.
            if previous.is_none() && !evicted {
                self.size.fetch_add(1, Ordering::Relaxed);
            }
            (previous, evicted)
        };
        if previous.is_some() {
            self.counters.inc_update();
        } else {
            self.counters.inc_insert();
            if evicted {
                self.counters.inc_eviction();
            }
        }
        previous
    }

    /// Drops every entry, holding all shard writers for the duration.
    fn clear(&self) {
        let mut guards: Vec<_> = self.shards.iter().map(|shard| shard.write()).collect();
        for guard in guards.iter_mut() {
            guard.clear();
        }
        self.size.store(0, Ordering::Relaxed);
    }

    /// Current number of entries across all shards.
    fn len(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }

    /// Effective capacity (requested capacity rounded up per shard).
    fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshots the store's counters.
    fn metrics(&self) -> StoreMetrics {
        self.counters.snapshot()
    }
}

impl<K, V> std::fmt::Debug for ShardedClockStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedClockStore")
            .field("capacity", &self.capacity)
            .field("shards", &self.shards.len())
            .field("len", &self.size.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_shard(capacity: usize) -> ShardedClockStore<&'static str, i32> {
        ShardedClockStore::new(capacity, 1)
    }

    mod basic_operations {
        use super::*;

        #[test]
        fn insert_and_get() {
            let store = single_shard(10);
            store.insert("a", Arc::new(1));
            store.insert("b", Arc::new(2));

            assert_eq!(store.get(&"a").as_deref(), Some(&1));
            assert_eq!(store.get(&"b").as_deref(), Some(&2));
            assert_eq!(store.get(&"c"), None);
            assert_eq!(store.len(), 2);
        }

        #[test]
        fn insert_returns_previous_value() {
            let store = single_shard(10);
            assert!(store.insert("a", Arc::new(1)).is_none());
            assert_eq!(store.insert("a", Arc::new(2)).as_deref(), Some(&1));
            assert_eq!(store.get(&"a").as_deref(), Some(&2));
            assert_eq!(store.len(), 1);
        }

        #[test]
        fn contains_does_not_count() {
            let store = single_shard(10);
            store.insert("a", Arc::new(1));

            assert!(store.contains(&"a"));
            assert!(!store.contains(&"b"));
            let metrics = store.metrics();
            assert_eq!(metrics.hits, 0);
            assert_eq!(metrics.misses, 0);
        }

        #[test]
        fn clear_empties_all_shards() {
            let store: ShardedClockStore<u64, u64> = ShardedClockStore::new(64, 4);
            for key in 0..32 {
                store.insert(key, Arc::new(key));
            }
            assert_eq!(store.len(), 32);

            store.clear();
            assert_eq!(store.len(), 0);
            assert!(store.is_empty());
            for key in 0..32 {
                assert!(!store.contains(&key));
            }

            // The store stays usable after a clear.
            store.insert(7, Arc::new(7));
            assert_eq!(store.get(&7).as_deref(), Some(&7));
        }

        #[test]
        fn clear_preserves_counters() {
            let store = single_shard(10);
            store.insert("a", Arc::new(1));
            let _ = store.get(&"a");
            let _ = store.get(&"missing");

            store.clear();
            let metrics = store.metrics();
            assert_eq!(metrics.hits, 1);
            assert_eq!(metrics.misses, 1);
            assert_eq!(metrics.inserts, 1);
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn stays_within_capacity() {
            let store = single_shard(2);
            for (i, key) in ["a", "b", "c", "d", "e"].iter().enumerate() {
                store.insert(*key, Arc::new(i as i32));
            }
            assert_eq!(store.len(), 2);
            assert_eq!(store.metrics().evictions, 3);
        }

        #[test]
        fn unreferenced_entry_evicted_first() {
            let store = single_shard(3);
            store.insert("a", Arc::new(1));
            store.insert("b", Arc::new(2));
            store.insert("c", Arc::new(3));

            // Hit "a" so the sweep clears its bit and takes "b" instead.
            let _ = store.get(&"a");
            store.insert("d", Arc::new(4));

            assert!(store.contains(&"a"));
            assert!(!store.contains(&"b"));
            assert!(store.contains(&"c"));
            assert!(store.contains(&"d"));
        }

        #[test]
        fn sweep_clears_bits_when_everything_referenced() {
            let store = single_shard(3);
            store.insert("a", Arc::new(1));
            store.insert("b", Arc::new(2));
            store.insert("c", Arc::new(3));
            let _ = store.get(&"a");
            let _ = store.get(&"b");
            let _ = store.get(&"c");

            // Full revolution clears every bit, then "a" goes.
            store.insert("d", Arc::new(4));
            assert!(!store.contains(&"a"));
            assert_eq!(store.len(), 3);
        }

        #[test]
        fn capacity_one() {
            let store = single_shard(1);
            store.insert("a", Arc::new(1));
            store.insert("b", Arc::new(2));

            assert!(!store.contains(&"a"));
            assert_eq!(store.get(&"b").as_deref(), Some(&2));
            assert_eq!(store.len(), 1);
        }

        #[test]
        fn churn_never_exceeds_capacity() {
            let store: ShardedClockStore<u64, u64> = ShardedClockStore::new(16, 4);
            for key in 0..1000 {
                store.insert(key, Arc::new(key));
            }
            assert!(store.len() <= store.capacity());
        }
    }

    mod sharding {
        use super::*;

        #[test]
        fn capacity_rounds_up_to_shard_multiple() {
            let store: ShardedClockStore<u64, u64> = ShardedClockStore::new(10, 4);
            assert_eq!(store.shard_count(), 4);
            assert_eq!(store.capacity(), 12);
        }

        #[test]
        fn zero_parameters_clamped() {
            let store: ShardedClockStore<u64, u64> = ShardedClockStore::new(0, 0);
            assert_eq!(store.shard_count(), 1);
            assert_eq!(store.capacity(), 1);
        }

        #[test]
        fn len_aggregates_across_shards() {
            let store: ShardedClockStore<u64, u64> = ShardedClockStore::new(1000, 8);
            for key in 0..100 {
                store.insert(key, Arc::new(key));
            }
            assert_eq!(store.len(), 100);
        }

        #[test]
        fn seeded_stores_agree_on_lookups() {
            let store: ShardedClockStore<u64, u64> = ShardedClockStore::with_seed(100, 4, 99);
            store.insert(42, Arc::new(42));
            assert_eq!(store.get(&42).as_deref(), Some(&42));
        }
    }

    mod metrics {
        use super::*;

        #[test]
        fn counters_track_operations() {
            let store = single_shard(10);
            assert_eq!(store.metrics(), StoreMetrics::default());

            store.insert("a", Arc::new(1));
            store.insert("a", Arc::new(2));
            let _ = store.get(&"a");
            let _ = store.get(&"missing");

            let metrics = store.metrics();
            assert_eq!(metrics.inserts, 1);
            assert_eq!(metrics.updates, 1);
            assert_eq!(metrics.hits, 1);
            assert_eq!(metrics.misses, 1);
            assert_eq!(metrics.requests(), 2);
        }

        #[test]
        fn eviction_counted_once_per_displaced_entry() {
            let store = single_shard(1);
            store.insert("a", Arc::new(1));
            store.insert("b", Arc::new(2));
            store.insert("c", Arc::new(3));

            assert_eq!(store.metrics().evictions, 2);
            assert_eq!(store.metrics().inserts, 3);
        }
    }
}
