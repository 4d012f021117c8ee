//! In-Memory Cache Module
//!
//! Reference [`CacheStore`] backed by a reader/writer-locked `HashMap`, with
//! lock-free hit/miss counters, an optional capacity bound and a background
//! sweeper for expired entries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStats, CacheStore};
use crate::tasks::spawn_sweep_task;

/// Sweep interval used when none is configured.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5 * 60);

// == Options ==
/// Construction parameters for [`MemoryCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryCacheOptions {
    /// Maximum number of entries, 0 for unbounded
    pub max_size: usize,
    /// How often expired entries are swept; zero selects the default
    pub cleanup_interval: Duration,
}

impl Default for MemoryCacheOptions {
    fn default() -> Self {
        Self {
            max_size: 0,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

impl MemoryCacheOptions {
    /// Bounds the cache to `max_size` entries.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Sets the sweep interval.
    pub fn with_cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    fn effective_interval(&self) -> Duration {
        if self.cleanup_interval.is_zero() {
            DEFAULT_CLEANUP_INTERVAL
        } else {
            self.cleanup_interval
        }
    }
}

// == Entry Map ==
/// Shared state between the cache handle and its sweeper task.
#[derive(Debug)]
pub(crate) struct EntryMap {
    entries: RwLock<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    max_size: usize,
}

impl EntryMap {
    fn new(max_size: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            max_size,
        }
    }

    // Entries are always left consistent, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Remove Expired ==
    /// Drops every expired entry and returns how many were removed.
    pub(crate) fn remove_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }
}

/// Picks the entry to drop when the map is full.
///
/// The first expired entry encountered wins; otherwise the entry with the
/// earliest `created_at`. Ties go to whichever the map yields first.
fn select_victim(entries: &HashMap<String, CacheEntry>, now: DateTime<Utc>) -> Option<String> {
    let mut oldest: Option<(&String, DateTime<Utc>)> = None;

    for (key, entry) in entries {
        if entry.is_expired_at(now) {
            return Some(key.clone());
        }
        let is_older = oldest.map_or(true, |(_, created_at)| entry.created_at < created_at);
        if is_older {
            oldest = Some((key, entry.created_at));
        }
    }

    oldest.map(|(key, _)| key.clone())
}

struct Sweeper {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

// == Memory Cache ==
/// Thread-safe in-memory response cache.
///
/// The sweeper is spawned on the current Tokio runtime at construction. It
/// stops on [`shutdown`](Self::shutdown) or when the cache is dropped.
/// Constructed outside a runtime, the cache runs without a sweeper and relies
/// on lazy expiry alone.
pub struct MemoryCache {
    pub(crate) map: Arc<EntryMap>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates a cache and starts its background sweeper.
    pub fn new(options: MemoryCacheOptions) -> Self {
        let map = Arc::new(EntryMap::new(options.max_size));
        let interval = options.effective_interval();

        let sweeper = match Handle::try_current() {
            Ok(_) => {
                let (stop, stop_rx) = oneshot::channel();
                let handle = spawn_sweep_task(map.clone(), interval, stop_rx);
                Some(Sweeper { stop, handle })
            }
            Err(_) => {
                warn!("No Tokio runtime available, background sweep disabled");
                None
            }
        };

        Self {
            map,
            sweeper: Mutex::new(sweeper),
        }
    }

    // == Shutdown ==
    /// Stops the background sweeper.
    ///
    /// Safe to call any number of times. The cache keeps serving reads and
    /// writes afterwards; expired entries are then only removed lazily.
    pub fn shutdown(&self) {
        let sweeper = self
            .sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(sweeper) = sweeper {
            // The task may already be gone if the runtime shut down first
            let _ = sweeper.stop.send(());
            info!("Memory cache sweeper stopped");
        }
    }

    /// Returns true while the background sweeper is running.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|sweeper| !sweeper.handle.is_finished())
    }

    // == Cleanup Expired ==
    /// Runs one sweep immediately and returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        self.map.remove_expired()
    }

    /// Configured capacity, 0 meaning unbounded.
    pub fn max_size(&self) -> usize {
        self.map.max_size
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(MemoryCacheOptions::default())
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("max_size", &self.map.max_size)
            .field("stats", &self.stats())
            .finish()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        // Clone under the read lock so a racing set never yields a torn entry
        let entry = self.map.read().get(key).cloned();

        let Some(entry) = entry else {
            self.map.record_miss();
            debug!(key, "cache miss");
            return None;
        };

        if entry.is_expired() {
            self.delete(key);
            self.map.record_miss();
            debug!(key, "cache miss (expired)");
            return None;
        }

        self.map.record_hit();
        debug!(key, "cache hit");
        Some(entry)
    }

    fn set(&self, key: &str, mut entry: CacheEntry, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }

        let now = Utc::now();
        let mut entries = self.map.write();

        let max_size = self.map.max_size;
        if max_size > 0 && entries.len() >= max_size {
            if let Some(victim) = select_victim(&entries, now) {
                entries.remove(&victim);
                debug!(key = %victim, "evicted entry to make room");
            }
        }

        entry.stamp_expiry(now, ttl);
        entries.insert(key.to_string(), entry);
    }

    fn delete(&self, key: &str) {
        self.map.write().remove(key);
    }

    fn clear(&self) {
        self.map.write().clear();
    }

    fn stats(&self) -> CacheStats {
        let size = self.map.read().len();
        CacheStats::new(
            self.map.hits.load(Ordering::Relaxed),
            self.map.misses.load(Ordering::Relaxed),
            size,
        )
    }
}
