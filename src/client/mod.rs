//! Client Module
//!
//! The request executor: resolves each request, consults the cache policy
//! and store, and only reaches the transport on a miss, a forced refresh or
//! an uncached request.

mod message;
mod transport;

use std::time::Instant;

use reqwest::Url;
use tracing::debug;

use crate::cache::CacheStats;
use crate::error::{ClientError, Result};
use crate::policy::{
    cache_ttl, generate_cache_key, should_cache, should_force_refresh, CacheConfig,
};

pub use message::{HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport, TransportRequest};

/// Methods the client accepts.
pub const VALID_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

// == Client ==
/// HTTP client with an optional response cache.
///
/// The cache configuration is fixed at construction and shared read-only by
/// every request the client executes.
#[derive(Debug, Clone)]
pub struct Client<T = ReqwestTransport> {
    base_url: Option<String>,
    transport: T,
    cache: Option<CacheConfig>,
}

impl Client<ReqwestTransport> {
    /// Creates an uncached client; an empty `base_url` means none.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, ReqwestTransport::new())
    }

    /// Creates a client whose requests may opt in to `config`.
    pub fn with_cache(base_url: impl Into<String>, config: CacheConfig) -> Self {
        Self::new(base_url).cache_config(config)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: (!base_url.is_empty()).then_some(base_url),
            transport,
            cache: None,
        }
    }

    /// Attaches a cache configuration.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache = Some(config);
        self
    }

    pub fn cache(&self) -> Option<&CacheConfig> {
        self.cache.as_ref()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    // == Cache Management ==
    /// Statistics of the configured store, if any.
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|config| config.store.stats())
    }

    /// Empties the configured store.
    pub fn clear_cache(&self) {
        if let Some(config) = &self.cache {
            config.store.clear();
        }
    }

    /// Removes one cached response by key.
    pub fn invalidate(&self, key: &str) {
        if let Some(config) = &self.cache {
            config.store.delete(key);
        }
    }

    // == Request ==
    /// Executes `request`, serving it from the cache when allowed.
    ///
    /// Only 2xx responses are written to the cache. A cache hit performs no
    /// network call and returns a response with `from_cache` set.
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = normalize_method(&request.method)?;
        let url = self.resolve_url(&request.url, &request.params)?;
        let options = request.cache.as_ref();

        let outgoing = TransportRequest {
            method,
            url,
            headers: request.headers.clone(),
            body: request.body.clone(),
            timeout: request.timeout,
        };

        let config = match &self.cache {
            Some(config) if should_cache(Some(config), options, &outgoing.method) => config,
            _ => return self.send(outgoing).await,
        };

        let key = generate_cache_key(
            config,
            options,
            &outgoing.method,
            &outgoing.url,
            &outgoing.headers,
        );

        if should_force_refresh(options) {
            debug!(key = %key, "Force refresh, bypassing cache read");
        } else if let Some(entry) = config.store.get(&key) {
            debug!(key = %key, "Serving response from cache");
            return Ok(HttpResponse::from(entry));
        }

        let response = self.send(outgoing).await?;

        if response.is_success() {
            config
                .store
                .set(&key, response.to_entry(), cache_ttl(config, options));
        } else {
            debug!(
                key = %key,
                status = response.status_code,
                "Not caching unsuccessful response"
            );
        }

        Ok(response)
    }

    async fn send(&self, request: TransportRequest) -> Result<HttpResponse> {
        let started = Instant::now();
        let method = request.method.clone();
        let url = request.url.clone();

        let result = self.transport.send(request).await;
        match &result {
            Ok(response) => debug!(
                method = %method,
                url = %url,
                status = response.status_code,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Request completed"
            ),
            Err(err) => debug!(method = %method, url = %url, error = %err, "Request failed"),
        }
        result
    }

    // == Resolve URL ==
    /// Joins `path` onto the base URL and appends query parameters.
    ///
    /// Absolute `http`/`https` URLs ignore the base URL.
    pub fn resolve_url(&self, path: &str, params: &[(String, String)]) -> Result<String> {
        let is_absolute = path.starts_with("http://") || path.starts_with("https://");

        let joined = match &self.base_url {
            Some(base) if !is_absolute => {
                let path = path.trim_start_matches('/');
                if path.is_empty() {
                    base.clone()
                } else {
                    format!("{}/{}", base.trim_end_matches('/'), path)
                }
            }
            _ => path.to_string(),
        };

        if params.is_empty() {
            return Ok(joined);
        }

        let mut url = Url::parse(&joined)
            .map_err(|err| ClientError::InvalidUrl(format!("{joined}: {err}")))?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        Ok(url.into())
    }
}

/// Upper-cases `method`, defaulting empty to GET, and rejects unknown methods.
fn normalize_method(method: &str) -> Result<String> {
    if method.is_empty() {
        return Ok("GET".to_string());
    }

    let upper = method.to_ascii_uppercase();
    if VALID_METHODS.contains(&upper.as_str()) {
        Ok(upper)
    } else {
        Err(ClientError::InvalidMethod(method.to_string()))
    }
}
