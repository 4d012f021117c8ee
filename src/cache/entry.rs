//! Cache Entry Module
//!
//! Defines the snapshot of an HTTP response held by a cache store.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Response headers: header name to its values, in arrival order.
pub type Headers = BTreeMap<String, Vec<String>>;

// == Cache Entry ==
/// A stored HTTP response with creation and expiration metadata.
///
/// `expires_at` belongs to the store: whatever the caller puts there is
/// overwritten by [`CacheStore::set`](crate::cache::CacheStore::set).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Raw response body
    pub body: Vec<u8>,
    /// HTTP status code
    pub status_code: u16,
    /// Response headers
    pub headers: Headers,
    /// When the response was captured
    pub created_at: DateTime<Utc>,
    /// When the entry stops being served
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    ///
    /// `expires_at` starts equal to `created_at` until a store inserts it.
    pub fn new(status_code: u16, headers: Headers, body: Vec<u8>) -> Self {
        let now = Utc::now();
        Self {
            body,
            status_code,
            headers,
            created_at: now,
            expires_at: now,
        }
    }

    // == Is Expired ==
    /// Returns true once the current time is strictly after `expires_at`.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expiry check against an explicit instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime, or zero if the entry has expired.
    pub fn ttl_remaining(&self) -> Duration {
        (self.expires_at - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Stamps `expires_at` relative to `now`.
    pub(crate) fn stamp_expiry(&mut self, now: DateTime<Utc>, ttl: Duration) {
        self.expires_at = expiry_from(now, ttl);
    }
}

// == Utility Functions ==
/// Computes `now + ttl`, saturating at the maximum representable instant.
pub(crate) fn expiry_from(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
