//! Capability adapters over a backing store, including the get-or-load
//! orchestrator.
//!
//! Two thin wrappers expose a [`ConcurrentStore`] through the capability
//! tiers:
//!
//! - [`StoreCache`] implements [`ReadCache`] + [`PutCache`] and is meant for
//!   bulk-population code (a dataset assembler filling record caches).
//! - [`LoadingStoreCache`] implements [`ReadCache`] + [`LoadingCache`] and is
//!   meant for request-path code; the write-back on a successful load is the
//!   only way values enter it, so nothing on the hot path can overwrite
//!   entries unconditionally.
//!
//! Both hold the store behind an `Arc` and no state of their own, so counters
//! and entries live in exactly one place and adapters can share an engine.
//!
//! ## The get-or-load protocol
//!
//! ```text
//! get_or_load(key, loader):
//!   1. store.get(key)            -- counts a hit or a miss
//!   2. hit        -> return it
//!   3. miss       -> loader.load(key)
//!        Err(e)   -> propagate unchanged, cache untouched
//!        Ok(None) -> return None, cache untouched
//!        Ok(v)    -> store.insert(key, v); return v
//! ```
//!
//! The miss/load/insert sequence is not serialized across threads. Two
//! threads missing the same key may both run the loader and both write back;
//! the last write wins and the other result is dropped. That trade keeps the
//! hot path free of per-key locks and is safe for idempotent loaders.

use std::marker::PhantomData;
use std::sync::Arc;

use log::debug;

use crate::stats::CacheStats;
use crate::store::ShardedClockStore;
use crate::store::traits::ConcurrentStore;
use crate::traits::{LoadingCache, PutCache, ReadCache, ValueLoader};

/// Read- and put-capable adapter over a backing store.
///
/// # Example
///
/// ```
/// use uacache::loading::StoreCache;
/// use uacache::store::ShardedClockStore;
/// use uacache::traits::{PutCache, ReadCache};
///
/// let cache = StoreCache::new(ShardedClockStore::new(100, 4));
/// cache.put("node-17", 17_u32);
/// assert_eq!(cache.get(&"node-17").as_deref(), Some(&17));
/// ```
pub struct StoreCache<K, V, S = ShardedClockStore<K, V>> {
    store: Arc<S>,
    _kv: PhantomData<fn() -> (K, V)>,
}

/// Read- and loading-capable adapter over a backing store.
///
/// Exposes no `put`; entries appear only through the write-back of
/// [`get_or_load`](LoadingCache::get_or_load).
pub struct LoadingStoreCache<K, V, S = ShardedClockStore<K, V>> {
    store: Arc<S>,
    _kv: PhantomData<fn() -> (K, V)>,
}

impl<K, V, S> StoreCache<K, V, S>
where
    S: ConcurrentStore<K, V>,
{
    /// Wraps a store in the read/put tiers.
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Wraps an already shared store.
    ///
    /// Useful when one engine backs several adapters, e.g. a put-capable view
    /// for population and a loading view for lookups over the same entries.
    pub fn from_shared(store: Arc<S>) -> Self {
        Self {
            store,
            _kv: PhantomData,
        }
    }

    /// Returns the shared backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl<K, V, S> LoadingStoreCache<K, V, S>
where
    S: ConcurrentStore<K, V>,
{
    /// Wraps a store in the read/loading tiers.
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Wraps an already shared store.
    pub fn from_shared(store: Arc<S>) -> Self {
        Self {
            store,
            _kv: PhantomData,
        }
    }
}

fn stats_of<K, V, S: ConcurrentStore<K, V>>(store: &S) -> CacheStats {
    // One metrics snapshot feeds both fields, so misses <= requests holds in
    // every observed pair.
    let metrics = store.metrics();
    CacheStats {
        size: store.len(),
        requests: metrics.requests(),
        misses: metrics.misses,
    }
}

impl<K, V, S> ReadCache<K, V> for StoreCache<K, V, S>
where
    S: ConcurrentStore<K, V>,
{
    fn get(&self, key: &K) -> Option<Arc<V>> {
        self.store.get(key)
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn capacity(&self) -> usize {
        self.store.capacity()
    }

    fn stats(&self) -> CacheStats {
        stats_of(self.store.as_ref())
    }

    fn reset(&self) {
        debug!("resetting cache ({} entries dropped)", self.store.len());
        self.store.clear();
    }
}

impl<K, V, S> PutCache<K, V> for StoreCache<K, V, S>
where
    S: ConcurrentStore<K, V>,
{
    fn put(&self, key: K, value: V) {
        self.store.insert(key, Arc::new(value));
    }
}

impl<K, V, S> ReadCache<K, V> for LoadingStoreCache<K, V, S>
where
    S: ConcurrentStore<K, V>,
{
    fn get(&self, key: &K) -> Option<Arc<V>> {
        self.store.get(key)
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn capacity(&self) -> usize {
        self.store.capacity()
    }

    fn stats(&self) -> CacheStats {
        stats_of(self.store.as_ref())
    }

    fn reset(&self) {
        debug!("resetting loading cache ({} entries dropped)", self.store.len());
        self.store.clear();
    }
}

impl<K, V, S> LoadingCache<K, V> for LoadingStoreCache<K, V, S>
where
    K: Clone,
    S: ConcurrentStore<K, V>,
{
    fn get_or_load<L>(&self, key: &K, loader: &L) -> Result<Option<Arc<V>>, L::Error>
    where
        L: ValueLoader<K, V> + ?Sized,
    {
        if let Some(value) = self.store.get(key) {
            return Ok(Some(value));
        }
        match loader.load(key)? {
            Some(value) => {
                let value = Arc::new(value);
                self.store.insert(key.clone(), Arc::clone(&value));
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

impl<K, V, S> std::fmt::Debug for StoreCache<K, V, S>
where
    S: ConcurrentStore<K, V>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCache")
            .field("len", &self.store.len())
            .field("capacity", &self.store.capacity())
            .finish_non_exhaustive()
    }
}

impl<K, V, S> std::fmt::Debug for LoadingStoreCache<K, V, S>
where
    S: ConcurrentStore<K, V>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingStoreCache")
            .field("len", &self.store.len())
            .field("capacity", &self.store.capacity())
            .finish_non_exhaustive()
    }
}
