//! Client-wide cache configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheStore;

/// Request headers as seen by key functions: name to single value.
pub type RequestHeaders = BTreeMap<String, String>;

/// Builds a cache key from `(method, full_url, headers)`.
pub type KeyFn = Arc<dyn Fn(&str, &str, &RequestHeaders) -> String + Send + Sync>;

/// Methods cached when no allow-list is configured.
pub const DEFAULT_CACHEABLE_METHODS: &[&str] = &["GET"];

/// Default key format: `"<METHOD>:<full URL>"`.
pub fn default_cache_key(method: &str, full_url: &str, _headers: &RequestHeaders) -> String {
    format!("{method}:{full_url}")
}

// == Cache Config ==
/// Cache settings owned by a client and shared by all its requests.
///
/// Cloning is cheap; the store is reference counted.
#[derive(Clone)]
pub struct CacheConfig {
    /// Backing store
    pub store: Arc<dyn CacheStore>,
    /// TTL applied when a request gives none; zero stores nothing
    pub default_ttl: Duration,
    /// Custom key builder, replacing [`default_cache_key`]
    pub key_fn: Option<KeyFn>,
    /// Methods eligible for caching, compared case-insensitively
    pub cacheable_methods: Option<Vec<String>>,
}

impl CacheConfig {
    /// Creates a config over `store` with no default TTL.
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            default_ttl: Duration::ZERO,
            key_fn: None,
            cacheable_methods: None,
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_key_fn<F>(mut self, key_fn: F) -> Self
    where
        F: Fn(&str, &str, &RequestHeaders) -> String + Send + Sync + 'static,
    {
        self.key_fn = Some(Arc::new(key_fn));
        self
    }

    pub fn with_cacheable_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cacheable_methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }
}

impl fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("default_ttl", &self.default_ttl)
            .field("key_fn", &self.key_fn.as_ref().map(|_| "<fn>"))
            .field("cacheable_methods", &self.cacheable_methods)
            .finish_non_exhaustive()
    }
}
