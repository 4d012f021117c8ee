//! Configuration Module
//!
//! Loads cache and client settings from environment variables.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheStore, MemoryCacheOptions};
use crate::policy::CacheConfig;

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of cached responses, 0 for unbounded
    pub max_entries: usize,
    /// Default TTL in seconds for requests that opt in without one
    pub default_ttl: u64,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// Base URL joined with relative request paths
    pub base_url: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 0, unbounded)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `BASE_URL` - Base URL for relative paths (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            base_url: env::var("BASE_URL").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Options for a [`MemoryCache`](crate::cache::MemoryCache) built from this config.
    pub fn memory_options(&self) -> MemoryCacheOptions {
        MemoryCacheOptions {
            max_size: self.max_entries,
            cleanup_interval: Duration::from_secs(self.cleanup_interval),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    /// Cache configuration over `store` using this config's default TTL.
    pub fn cache_config(&self, store: Arc<dyn CacheStore>) -> CacheConfig {
        CacheConfig::new(store).with_default_ttl(self.default_ttl())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 0,
            default_ttl: 300,
            cleanup_interval: 300,
            base_url: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
