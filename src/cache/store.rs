//! Cache Store Module
//!
//! The contract every response cache backend satisfies.

use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Storage backend for cached HTTP responses.
///
/// Implementations must tolerate concurrent calls from unrelated requests.
/// None of the operations fail: absence and expiry are both reported as
/// `None` from [`get`](Self::get), and a store that cannot hold an entry
/// simply drops it. A remote or on-disk backend plugs in by implementing
/// this trait.
pub trait CacheStore: Send + Sync {
    /// Returns a copy of the live entry under `key`.
    ///
    /// Records exactly one hit or miss. An expired entry counts as a miss
    /// and may be removed as a side effect.
    fn get(&self, key: &str) -> Option<CacheEntry>;

    /// Stores `entry` under `key`, stamping `expires_at = now + ttl`.
    ///
    /// A zero `ttl` is a no-op: nothing is stored and any existing entry
    /// under `key` is left untouched.
    fn set(&self, key: &str, entry: CacheEntry, ttl: Duration);

    /// Removes the entry under `key`, if any.
    fn delete(&self, key: &str);

    /// Removes every entry. Hit and miss counters are preserved.
    fn clear(&self);

    /// Returns current counters and entry count.
    fn stats(&self) -> CacheStats;
}
