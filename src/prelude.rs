//! Convenience re-exports for the common path: build a cache, use the tiers.

pub use crate::builder::CacheBuilder;
pub use crate::error::ConfigError;
pub use crate::loading::{LoadingStoreCache, StoreCache};
pub use crate::registry::{CacheRegistry, CacheRole};
pub use crate::stats::CacheStats;
pub use crate::store::{ConcurrentStore, ShardedClockStore, StoreMetrics};
pub use crate::traits::{LoadingCache, PutCache, ReadCache, ValueLoader};
