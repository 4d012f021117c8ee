//! Cache Policy Module
//!
//! Pure decision functions combining the client's [`CacheConfig`] with a
//! request's [`RequestCacheOptions`]: whether to cache, under which key,
//! for how long, and whether to bypass the read.
//!
//! Caching is opt-in. A configured store and default TTL never activate
//! caching by themselves; each request must ask for it.

mod config;
mod options;

use std::time::Duration;

pub use config::{default_cache_key, CacheConfig, KeyFn, RequestHeaders, DEFAULT_CACHEABLE_METHODS};
pub use options::{CacheMode, RequestCacheOptions};

// == Should Cache ==
/// Decides whether a request participates in caching at all.
pub fn should_cache(
    config: Option<&CacheConfig>,
    options: Option<&RequestCacheOptions>,
    method: &str,
) -> bool {
    let Some(config) = config else {
        return false;
    };

    match options.map(|o| o.mode).unwrap_or_default() {
        CacheMode::Enabled => is_method_cacheable(config, method),
        CacheMode::Disabled | CacheMode::Unspecified => false,
    }
}

// == Is Method Cacheable ==
/// Case-insensitive check of `method` against the configured allow-list,
/// or [`DEFAULT_CACHEABLE_METHODS`] when none is set.
pub fn is_method_cacheable(config: &CacheConfig, method: &str) -> bool {
    match &config.cacheable_methods {
        Some(methods) => methods.iter().any(|m| m.eq_ignore_ascii_case(method)),
        None => DEFAULT_CACHEABLE_METHODS
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method)),
    }
}

/// True when the request asked to skip the cache read.
pub fn should_force_refresh(options: Option<&RequestCacheOptions>) -> bool {
    options.is_some_and(|o| o.force_refresh)
}

// == Generate Cache Key ==
/// Resolves the cache key for a request.
///
/// Precedence: non-empty per-request custom key, then the configured key
/// function, then [`default_cache_key`].
pub fn generate_cache_key(
    config: &CacheConfig,
    options: Option<&RequestCacheOptions>,
    method: &str,
    full_url: &str,
    headers: &RequestHeaders,
) -> String {
    if let Some(key) = options
        .and_then(|o| o.custom_key.as_deref())
        .filter(|key| !key.is_empty())
    {
        return key.to_string();
    }

    match &config.key_fn {
        Some(key_fn) => key_fn(method, full_url, headers),
        None => default_cache_key(method, full_url, headers),
    }
}

// == Cache TTL ==
/// Effective TTL: a non-zero per-request override, else the default TTL.
///
/// A zero result makes the store's `set` a no-op.
pub fn cache_ttl(config: &CacheConfig, options: Option<&RequestCacheOptions>) -> Duration {
    options
        .and_then(|o| o.ttl)
        .filter(|ttl| !ttl.is_zero())
        .unwrap_or(config.default_ttl)
}
