//! Cached Client - An HTTP client with a pluggable response cache
//!
//! Requests opt in to caching individually. Cached responses live in a
//! [`CacheStore`]; [`MemoryCache`] is the in-memory implementation with TTL
//! expiry, oldest-first capacity eviction and a background sweeper.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod policy;
mod tasks;

pub use cache::{CacheEntry, CacheStats, CacheStore, MemoryCache, MemoryCacheOptions};
pub use client::{Client, HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use config::Config;
pub use error::{ClientError, Result};
pub use policy::{CacheConfig, CacheMode, RequestCacheOptions};
