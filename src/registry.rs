//! Role-keyed cache registration for dataset assembly.
//!
//! A classification dataset is assembled from several internal record tables
//! (string table, trie nodes, property values, profiles, signatures), and the
//! assembler may want a put-capable cache in front of any of them. The
//! registry is the handoff point: construction code registers one cache per
//! [`CacheRole`], the assembler populates them through the put tier during
//! its load sequence, and afterwards only reads.
//!
//! Caches of different roles usually have different key and value types, so
//! the registry stores them type-erased and hands them back through a typed
//! lookup: asking for a role under the wrong key/value pairing returns
//! `None` rather than a mis-cast cache.

use std::any::Any;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::traits::PutCache;

/// Purpose identifier for a registered cache.
///
/// One variant per internal record table a dataset assembler can put a cache
/// in front of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheRole {
    /// Interned string table entries.
    Strings,
    /// Trie nodes walked during signature matching.
    Nodes,
    /// Property value records.
    Values,
    /// Hardware/browser profile records.
    Profiles,
    /// Complete signature records.
    Signatures,
}

/// Role-keyed collection of put-capable caches.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use uacache::builder::CacheBuilder;
/// use uacache::registry::{CacheRegistry, CacheRole};
/// use uacache::traits::{PutCache, ReadCache};
///
/// let mut registry = CacheRegistry::new();
/// registry.register::<u32, String>(
///     CacheRole::Nodes,
///     Arc::new(CacheBuilder::new(1000).build()),
/// );
///
/// let nodes = registry.put_cache::<u32, String>(CacheRole::Nodes).unwrap();
/// nodes.put(17, "node".to_string());
/// assert_eq!(nodes.get(&17).as_deref(), Some(&"node".to_string()));
///
/// // Same role, different typing: not the registered cache.
/// assert!(registry.put_cache::<u64, String>(CacheRole::Nodes).is_none());
/// ```
#[derive(Default)]
pub struct CacheRegistry {
    entries: FxHashMap<CacheRole, Box<dyn Any + Send + Sync>>,
}

impl CacheRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `cache` under `role`, replacing any previous registration.
    pub fn register<K, V>(&mut self, role: CacheRole, cache: Arc<dyn PutCache<K, V>>)
    where
        K: 'static,
        V: 'static,
    {
        self.entries.insert(role, Box::new(cache));
    }

    /// Looks up the cache registered under `role` with this key/value typing.
    pub fn put_cache<K, V>(&self, role: CacheRole) -> Option<Arc<dyn PutCache<K, V>>>
    where
        K: 'static,
        V: 'static,
    {
        self.entries
            .get(&role)?
            .downcast_ref::<Arc<dyn PutCache<K, V>>>()
            .cloned()
    }

    /// Returns `true` if any cache is registered under `role`.
    pub fn contains(&self, role: CacheRole) -> bool {
        self.entries.contains_key(&role)
    }

    /// Number of registered caches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("roles", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
