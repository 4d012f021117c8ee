//! Request and response types exchanged with [`Client`](super::Client).

use std::borrow::Cow;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::{CacheEntry, Headers};
use crate::error::Result;
use crate::policy::{RequestCacheOptions, RequestHeaders};

// == Http Request ==
/// A request to execute, with optional per-request cache directives.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    /// HTTP method, validated case-insensitively
    pub method: String,
    /// Absolute URL, or a path joined onto the client's base URL
    pub url: String,
    /// Query parameters appended to the resolved URL
    pub params: Vec<(String, String)>,
    pub headers: RequestHeaders,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
    /// Cache directives; `None` behaves like an unspecified opt-in
    pub cache: Option<RequestCacheOptions>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new("PUT", url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new("DELETE", url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new("PATCH", url)
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new("HEAD", url)
    }

    pub fn options(url: impl Into<String>) -> Self {
        Self::new("OPTIONS", url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `value` as the body and defaults `Content-Type` to JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(value)?);
        self.headers
            .entry("Content-Type".to_string())
            .or_insert_with(|| "application/json".to_string());
        Ok(self)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cache(mut self, options: RequestCacheOptions) -> Self {
        self.cache = Some(options);
        self
    }
}

// == Http Response ==
/// A response, either fresh from the transport or replayed from the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
    /// True when served from the cache without a network call
    pub from_cache: bool,
}

impl HttpResponse {
    pub fn new(status_code: u16, headers: Headers, body: Vec<u8>) -> Self {
        Self {
            status_code,
            headers,
            body,
            from_cache: false,
        }
    }

    /// Returns true for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// First value of header `name`, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    pub(crate) fn to_entry(&self) -> CacheEntry {
        CacheEntry::new(self.status_code, self.headers.clone(), self.body.clone())
    }
}

impl From<CacheEntry> for HttpResponse {
    fn from(entry: CacheEntry) -> Self {
        Self {
            status_code: entry.status_code,
            headers: entry.headers,
            body: entry.body,
            from_cache: true,
        }
    }
}
