//! Cache Module
//!
//! Response cache storage: the [`CacheStore`] contract, the records it holds
//! and the in-memory reference implementation.

mod entry;
mod memory;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, Headers};
pub use memory::{MemoryCache, MemoryCacheOptions, DEFAULT_CLEANUP_INTERVAL};
pub use stats::CacheStats;
pub use store::CacheStore;

pub(crate) use memory::EntryMap;
