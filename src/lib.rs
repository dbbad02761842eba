//! uacache: capability-tiered caching primitives for lookup-heavy
//! classification engines.
//!
//! A cache is exposed through three nested capability tiers: read-only
//! ([`traits::ReadCache`]), put-capable ([`traits::PutCache`]), and loading
//! ([`traits::LoadingCache`], which composes a cache with a caller-supplied
//! [`traits::ValueLoader`] so misses transparently compute and backfill).
//! The bundled engine is a sharded, bounded store with clock eviction
//! ([`store::ShardedClockStore`]); any other engine can sit behind the same
//! tiers by implementing [`store::ConcurrentStore`].

pub mod builder;
pub mod error;
pub mod loading;
pub mod prelude;
pub mod registry;
pub mod stats;
pub mod store;
pub mod traits;
