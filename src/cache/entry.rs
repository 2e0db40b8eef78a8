//! Cache Entry Module
//!
//! Defines the structure for individual result-store entries with TTL support.

use std::sync::Arc;
use std::time::Duration;

use crate::clock::duration_ms;

// == Cache Entry ==
/// A stored value together with its lifetime.
///
/// `expires_at` is always strictly greater than `created_at`; a zero TTL is
/// rounded up to one millisecond.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored value, shared with every caller that reads it
    pub value: Arc<V>,
    /// Insertion timestamp (clock milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (clock milliseconds)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry inserted at `now` that lives for `ttl`.
    pub fn new(value: Arc<V>, now: u64, ttl: Duration) -> Self {
        let ttl_ms = duration_ms(ttl).max(1);
        Self {
            value,
            created_at: now,
            expires_at: now.saturating_add(ttl_ms),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now >= expires_at`, so a value is never
    /// served at the exact instant its TTL elapses.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

// Manual impl: cloning an entry never requires cloning the value itself.
impl<V> Clone for CacheEntry<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}
