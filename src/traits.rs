//! # Cache Capability Tiers
//!
//! This module defines the capability tiers a cache can expose and the loader
//! contract that turns a cache into a read-through cache. Rather than one wide
//! interface, capabilities are split so each consumer depends on the narrowest
//! tier it needs.
//!
//! ## Architecture
//!
//! ```text
//!                  ┌──────────────────────────────────────┐
//!                  │           ReadCache<K, V>            │
//!                  │                                      │
//!                  │  get(&K) -> Option<Arc<V>>           │
//!                  │  len / is_empty / capacity           │
//!                  │  stats / request_count / miss_count  │
//!                  │  miss_ratio / reset                  │
//!                  └───────────────┬──────────────────────┘
//!                                  │
//!                ┌─────────────────┴──────────────────┐
//!                ▼                                    ▼
//!   ┌───────────────────────────┐      ┌─────────────────────────────────┐
//!   │      PutCache<K, V>       │      │       LoadingCache<K, V>        │
//!   │                           │      │                                 │
//!   │  put(K, V)                │      │  get_or_load(&K, &L)            │
//!   │  (unconditional insert    │      │    -> Result<Option<Arc<V>>,    │
//!   │   or overwrite)           │      │              L::Error>          │
//!   └───────────────────────────┘      └─────────────────────────────────┘
//! ```
//!
//! `PutCache` and `LoadingCache` are siblings, not a chain: a type can expose
//! the loading tier without handing callers an unconditional `put`. Bulk
//! population code (a dataset assembler filling record caches at startup) uses
//! `PutCache`; request-path code uses only `LoadingCache`, so nothing on the
//! hot path can clobber entries by accident.
//!
//! ## Trait Summary
//!
//! | Trait            | Extends     | Purpose                               |
//! |------------------|-------------|---------------------------------------|
//! | `ReadCache`      | -           | Lookup, counters, reset               |
//! | `PutCache`       | `ReadCache` | Adds unconditional insert/overwrite   |
//! | `LoadingCache`   | `ReadCache` | Adds compute-on-miss with backfill    |
//! | `ValueLoader`    | -           | Caller-supplied miss computation      |
//!
//! ## Thread Safety
//!
//! Every tier takes `&self` and requires `Send + Sync`: callers share a cache
//! across worker threads without any locking of their own. All
//! synchronization lives in the implementation and its backing store.
//!
//! ## Trait Bounds
//!
//! The tiers place no bounds on `K` and `V`; implementations add what they
//! need (typically `K: Eq + Hash` for lookup and `K: Clone` for backfill).
//! Values come back as `Arc<V>` so a hit can be handed out while the entry is
//! concurrently evicted, and absence is always `None`, never a sentinel value.

use std::sync::Arc;

use crate::stats::CacheStats;

/// Read-only view of a cache.
///
/// Lookup never fails: a missing key is a normal outcome, reported as `None`.
/// The counter accessors expose the same numbers a monitoring dashboard would
/// scrape, captured per call as one [`CacheStats`] snapshot.
///
/// # Example
///
/// ```
/// use uacache::builder::CacheBuilder;
/// use uacache::traits::{PutCache, ReadCache};
///
/// let cache = CacheBuilder::new(100).build::<u64, String>();
/// cache.put(1, "desktop".to_string());
///
/// assert_eq!(cache.get(&1).as_deref(), Some(&"desktop".to_string()));
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.len(), 1);
/// ```
pub trait ReadCache<K, V>: Send + Sync {
    /// Looks up a value by key.
    ///
    /// Returns `None` when the key is not cached. Each call counts as one
    /// request (and one miss when it returns `None`) in the cache statistics.
    fn get(&self, key: &K) -> Option<Arc<V>>;

    /// Number of entries currently cached.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries the cache will hold.
    fn capacity(&self) -> usize;

    /// Captures the current counters as one consistent snapshot.
    fn stats(&self) -> CacheStats;

    /// Cumulative number of lookups, hit or miss.
    ///
    /// Monotonically non-decreasing; increases by exactly one per [`get`]
    /// call.
    ///
    /// [`get`]: Self::get
    fn request_count(&self) -> u64 {
        self.stats().requests
    }

    /// Cumulative number of lookups that found nothing.
    ///
    /// Monotonically non-decreasing and never greater than
    /// [`request_count`](Self::request_count).
    fn miss_count(&self) -> u64 {
        self.stats().misses
    }

    /// Fraction of lookups that missed, in `[0.0, 1.0]`.
    ///
    /// Computed from a single [`stats`](Self::stats) snapshot; `0.0` before
    /// the first request.
    fn miss_ratio(&self) -> f64 {
        self.stats().miss_ratio()
    }

    /// Invalidates every entry.
    ///
    /// Lookups and inserts running concurrently with a reset observe either
    /// the old or the new entry set for any single key, never a torn mixture.
    /// Cumulative request and miss counters are unaffected.
    fn reset(&self);
}

/// A cache that can be populated directly.
///
/// `put` inserts or overwrites unconditionally and cannot fail; overwriting
/// an existing key is not an error. Intended for bulk-population paths, not
/// for request handling: keep this tier out of hot-path code and hand that
/// code a [`LoadingCache`] instead.
///
/// # Example
///
/// ```
/// use uacache::builder::CacheBuilder;
/// use uacache::traits::{PutCache, ReadCache};
///
/// let cache = CacheBuilder::new(10).build::<&str, u32>();
/// cache.put("profile-7", 7);
/// cache.put("profile-7", 700); // overwrite, no error
///
/// assert_eq!(cache.get(&"profile-7").as_deref(), Some(&700));
/// ```
pub trait PutCache<K, V>: ReadCache<K, V> {
    /// Inserts or overwrites the entry for `key`.
    fn put(&self, key: K, value: V);
}

/// A cache that computes missing values through a [`ValueLoader`].
///
/// This tier extends [`ReadCache`] but is deliberately independent of
/// [`PutCache`]: implementing it does not expose a raw `put` to callers. The
/// write-back on a successful load happens inside the implementation.
///
/// # Example
///
/// ```
/// use uacache::builder::CacheBuilder;
/// use uacache::traits::{LoadingCache, ReadCache};
///
/// let cache = CacheBuilder::new(100).build_loading::<String, usize>();
/// let loader = |ua: &String| Ok::<_, std::convert::Infallible>(Some(ua.len()));
///
/// let value = cache.get_or_load(&"Mozilla/5.0".to_string(), &loader).unwrap();
/// assert_eq!(*value.unwrap(), 11);
///
/// // The result was backfilled: a plain get now hits.
/// assert_eq!(cache.get(&"Mozilla/5.0".to_string()).as_deref(), Some(&11));
/// ```
pub trait LoadingCache<K, V>: ReadCache<K, V> {
    /// Looks up `key`, invoking `loader` on a miss.
    ///
    /// A cached value is returned immediately and the loader is not called.
    /// On a miss, `loader.load(key)` runs on the calling thread:
    ///
    /// - `Err(e)` propagates unchanged and nothing is cached,
    /// - `Ok(Some(v))` is written back and returned,
    /// - `Ok(None)` is a legitimate no-value outcome; nothing is written and
    ///   `None` is returned.
    ///
    /// Concurrent misses on the same key are not serialized: several threads
    /// may each invoke the loader and each write back, with the last write
    /// winning. With idempotent, side-effect-free loaders this is wasted work
    /// rather than corruption, and it is the documented behavior of this
    /// operation.
    fn get_or_load<L>(&self, key: &K, loader: &L) -> Result<Option<Arc<V>>, L::Error>
    where
        L: ValueLoader<K, V> + ?Sized;
}

/// Caller-supplied computation producing the value for an uncached key.
///
/// A loader may block (deferred I/O against backing data, an expensive
/// signature match) and runs on the thread that missed. It distinguishes a
/// legitimate "no value for this key" (`Ok(None)`) from a resolution failure
/// (`Err`), which [`LoadingCache::get_or_load`] surfaces to the caller
/// without caching anything.
///
/// Any `Fn(&K) -> Result<Option<V>, E>` closure is a loader:
///
/// ```
/// use uacache::traits::ValueLoader;
///
/// let loader = |key: &u32| Ok::<_, std::convert::Infallible>(Some(key * 2));
/// assert_eq!(loader.load(&21), Ok(Some(42)));
/// ```
pub trait ValueLoader<K, V> {
    /// Error reported when resolution fails; propagated unchanged by
    /// [`LoadingCache::get_or_load`].
    type Error;

    /// Computes the value for `key`.
    fn load(&self, key: &K) -> Result<Option<V>, Self::Error>;
}

impl<K, V, E, F> ValueLoader<K, V> for F
where
    F: Fn(&K) -> Result<Option<V>, E>,
{
    type Error = E;

    fn load(&self, key: &K) -> Result<Option<V>, E> {
        self(key)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    // Minimal tier implementation for exercising the default methods without
    // pulling in a real store.
    struct MapCache {
        map: Mutex<HashMap<u32, Arc<String>>>,
        requests: AtomicU64,
        misses: AtomicU64,
    }

    impl MapCache {
        fn new() -> Self {
            Self {
                map: Mutex::new(HashMap::new()),
                requests: AtomicU64::new(0),
                misses: AtomicU64::new(0),
            }
        }
    }

    impl ReadCache<u32, String> for MapCache {
        fn get(&self, key: &u32) -> Option<Arc<String>> {
            self.requests.fetch_add(1, Ordering::Relaxed);
            let found = self.map.lock().unwrap().get(key).cloned();
            if found.is_none() {
                self.misses.fetch_add(1, Ordering::Relaxed);
            }
            found
        }

        fn len(&self) -> usize {
            self.map.lock().unwrap().len()
        }

        fn capacity(&self) -> usize {
            usize::MAX
        }

        fn stats(&self) -> CacheStats {
            CacheStats {
                size: self.len(),
                requests: self.requests.load(Ordering::Relaxed),
                misses: self.misses.load(Ordering::Relaxed),
            }
        }

        fn reset(&self) {
            self.map.lock().unwrap().clear();
        }
    }

    impl PutCache<u32, String> for MapCache {
        fn put(&self, key: u32, value: String) {
            self.map.lock().unwrap().insert(key, Arc::new(value));
        }
    }

    #[test]
    fn default_counter_accessors_derive_from_stats() {
        let cache = MapCache::new();
        cache.put(1, "one".to_string());

        assert!(cache.get(&1).is_some());
        assert!(cache.get(&2).is_none());

        assert_eq!(cache.request_count(), 2);
        assert_eq!(cache.miss_count(), 1);
        assert_eq!(cache.miss_ratio(), 0.5);
    }

    #[test]
    fn miss_ratio_before_first_request_is_zero() {
        let cache = MapCache::new();
        assert_eq!(cache.miss_ratio(), 0.0);
    }

    #[test]
    fn is_empty_tracks_len() {
        let cache = MapCache::new();
        assert!(cache.is_empty());
        cache.put(1, "one".to_string());
        assert!(!cache.is_empty());
    }

    #[test]
    fn reset_empties_but_put_still_works() {
        let cache = MapCache::new();
        cache.put(1, "one".to_string());
        cache.reset();
        assert!(cache.get(&1).is_none());

        cache.put(2, "two".to_string());
        assert_eq!(cache.get(&2).as_deref(), Some(&"two".to_string()));
    }

    #[test]
    fn closures_are_loaders() {
        let double = |key: &u32| Ok::<_, String>(Some(key * 2));
        assert_eq!(double.load(&4), Ok(Some(8)));

        let absent = |_key: &u32| Ok::<Option<u32>, String>(None);
        assert_eq!(absent.load(&4), Ok(None));

        let failing = |_key: &u32| Err::<Option<u32>, String>("unreadable".into());
        assert_eq!(failing.load(&4), Err("unreadable".to_string()));
    }

    #[test]
    fn tier_bounds_allow_trait_objects_for_put_tier() {
        let cache: Arc<dyn PutCache<u32, String>> = Arc::new(MapCache::new());
        cache.put(9, "nine".to_string());
        assert_eq!(cache.len(), 1);
    }
}
