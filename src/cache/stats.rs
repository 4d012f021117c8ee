//! Cache Statistics Module
//!
//! Point-in-time view of cache hit/miss counters and occupancy.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot returned by [`CacheStore::stats`](crate::cache::CacheStore::stats).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a live entry (cumulative)
    pub hits: u64,
    /// Lookups that found nothing or an expired entry (cumulative)
    pub misses: u64,
    /// Entries currently held, expired-but-unswept ones included
    pub size: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a snapshot from raw counters.
    pub fn new(hits: u64, misses: u64, size: usize) -> Self {
        Self { hits, misses, size }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total number of lookups recorded.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }
}
