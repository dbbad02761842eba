//! Cache statistics snapshots.
//!
//! Every cache tier exposes its counters as a [`CacheStats`] value captured in
//! a single call, so the miss ratio is always computed from one internally
//! consistent pair of counters rather than from two live reads that could
//! straddle a concurrent update.

/// Point-in-time view of a cache's counters.
///
/// `requests` counts every readable `get`, hit or miss; `misses` counts the
/// subset that found nothing. Both are cumulative over the cache's lifetime
/// and survive a `reset()`, which only invalidates entries.
///
/// Snapshots taken under concurrent traffic may be slightly stale, but
/// `misses <= requests` holds in every snapshot.
///
/// # Example
///
/// ```
/// use uacache::stats::CacheStats;
///
/// let stats = CacheStats { size: 3, requests: 10, misses: 4 };
/// assert_eq!(stats.hits(), 6);
/// assert_eq!(stats.miss_ratio(), 0.4);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries currently cached.
    pub size: usize,
    /// Cumulative lookups, hit or miss.
    pub requests: u64,
    /// Cumulative lookups that found nothing.
    pub misses: u64,
}

impl CacheStats {
    /// Lookups that found a cached value.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.requests.saturating_sub(self.misses)
    }

    /// Fraction of lookups that missed, in `[0.0, 1.0]`.
    ///
    /// Defined as `0.0` when no requests have been made yet, so callers never
    /// see a division by zero surface as `NaN`.
    ///
    /// # Example
    ///
    /// ```
    /// use uacache::stats::CacheStats;
    ///
    /// assert_eq!(CacheStats::default().miss_ratio(), 0.0);
    /// ```
    #[inline]
    pub fn miss_ratio(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.misses as f64 / self.requests as f64
        }
    }
}
