//! Per-request cache options.

use std::time::Duration;

/// Whether a single request asked for caching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// The caller said nothing; caching stays off.
    #[default]
    Unspecified,
    /// The caller opted in.
    Enabled,
    /// The caller opted out.
    Disabled,
}

/// Cache directives attached to one request and dropped with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCacheOptions {
    /// Opt-in state for this request
    pub mode: CacheMode,
    /// TTL override; only a non-zero value takes effect
    pub ttl: Option<Duration>,
    /// Skip the cache read but still store the fresh response
    pub force_refresh: bool,
    /// Key override; only a non-empty value takes effect
    pub custom_key: Option<String>,
}

impl RequestCacheOptions {
    /// Opts in to caching with the given TTL.
    ///
    /// A zero `ttl` defers to the client's default TTL.
    pub fn enabled(ttl: Duration) -> Self {
        Self {
            mode: CacheMode::Enabled,
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    /// Opts out of caching.
    pub fn disabled() -> Self {
        Self {
            mode: CacheMode::Disabled,
            ..Self::default()
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }

    pub fn with_custom_key(mut self, key: impl Into<String>) -> Self {
        self.custom_key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unspecified() {
        let options = RequestCacheOptions::default();
        assert_eq!(options.mode, CacheMode::Unspecified);
        assert!(options.ttl.is_none());
        assert!(!options.force_refresh);
        assert!(options.custom_key.is_none());
    }

    #[test]
    fn test_enabled() {
        let options = RequestCacheOptions::enabled(Duration::from_secs(300));
        assert_eq!(options.mode, CacheMode::Enabled);
        assert_eq!(options.ttl, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_disabled() {
        let options = RequestCacheOptions::disabled();
        assert_eq!(options.mode, CacheMode::Disabled);
        assert!(options.ttl.is_none());
    }

    #[test]
    fn test_builders() {
        let options = RequestCacheOptions::enabled(Duration::ZERO)
            .with_ttl(Duration::from_secs(5))
            .with_force_refresh()
            .with_custom_key("zen");

        assert_eq!(options.ttl, Some(Duration::from_secs(5)));
        assert!(options.force_refresh);
        assert_eq!(options.custom_key.as_deref(), Some("zen"));
    }
}
