//! Cache construction.
//!
//! Caches are built once at startup with a fixed capacity and concurrency
//! policy, then injected into whatever consumes them; nothing here is a
//! process-wide singleton. The builder wires a [`ShardedClockStore`] behind
//! the capability adapters:
//!
//! ```
//! use uacache::builder::CacheBuilder;
//! use uacache::traits::{PutCache, ReadCache};
//!
//! let cache = CacheBuilder::new(100_000)
//!     .concurrency_level(8)
//!     .build::<String, u32>();
//!
//! cache.put("Mozilla/5.0".to_string(), 42);
//! assert_eq!(cache.capacity(), 100_000);
//! ```
//!
//! `build`/`build_loading` clamp degenerate parameters; the `try_` variants
//! reject them with a [`ConfigError`] instead, for when the numbers come from
//! user configuration.

use std::hash::Hash;

use log::debug;

use crate::error::ConfigError;
use crate::loading::{LoadingStoreCache, StoreCache};
use crate::store::ShardedClockStore;

/// Builder for the bundled sharded clock cache.
///
/// The concurrency level is the number of independently locked shards;
/// it defaults to the machine's available parallelism. Capacity is rounded
/// up to a multiple of the shard count.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    capacity: usize,
    shards: usize,
    seed: u64,
}

impl CacheBuilder {
    /// Starts a builder for a cache holding up to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        let shards = std::thread::available_parallelism()
            .map(|count| count.get())
            .unwrap_or(1);
        Self {
            capacity,
            shards,
            seed: 0,
        }
    }

    /// Sets the number of shards guarding the entries.
    ///
    /// Roughly the number of threads expected to hit the cache at once.
    pub fn concurrency_level(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    /// Sets the seed used for key-to-shard placement.
    pub fn shard_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds a read- and put-capable cache, clamping degenerate parameters
    /// to 1.
    pub fn build<K, V>(self) -> StoreCache<K, V, ShardedClockStore<K, V>>
    where
        K: Clone + Eq + Hash + Send + Sync,
        V: Send + Sync,
    {
        StoreCache::new(self.store())
    }

    /// Builds a read- and loading-capable cache, clamping degenerate
    /// parameters to 1.
    pub fn build_loading<K, V>(self) -> LoadingStoreCache<K, V, ShardedClockStore<K, V>>
    where
        K: Clone + Eq + Hash + Send + Sync,
        V: Send + Sync,
    {
        LoadingStoreCache::new(self.store())
    }

    /// Builds a read- and put-capable cache, rejecting invalid parameters.
    pub fn try_build<K, V>(self) -> Result<StoreCache<K, V, ShardedClockStore<K, V>>, ConfigError>
    where
        K: Clone + Eq + Hash + Send + Sync,
        V: Send + Sync,
    {
        self.validate()?;
        Ok(StoreCache::new(self.store()))
    }

    /// Builds a read- and loading-capable cache, rejecting invalid
    /// parameters.
    pub fn try_build_loading<K, V>(
        self,
    ) -> Result<LoadingStoreCache<K, V, ShardedClockStore<K, V>>, ConfigError>
    where
        K: Clone + Eq + Hash + Send + Sync,
        V: Send + Sync,
    {
        self.validate()?;
        Ok(LoadingStoreCache::new(self.store()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::new("capacity must be greater than zero"));
        }
        if self.shards == 0 {
            return Err(ConfigError::new(
                "concurrency level must be greater than zero",
            ));
        }
        Ok(())
    }

    fn store<K, V>(self) -> ShardedClockStore<K, V>
    where
        K: Clone + Eq + Hash,
    {
        debug!(
            "building sharded clock cache: capacity={} shards={}",
            self.capacity, self.shards
        );
        ShardedClockStore::with_seed(self.capacity, self.shards, self.seed)
    }
}
