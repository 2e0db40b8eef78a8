//! Result Store Module
//!
//! Key to (value, expiry) map with lazy expiry on read and bulk purge for the sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::CacheEntry;

// == Result Store ==
/// Settled values keyed by request key.
///
/// Not synchronized on its own; [`KeyedCache`](crate::KeyedCache) keeps it
/// behind a mutex and passes the current clock reading into every call.
#[derive(Debug)]
pub struct ResultStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    hits: u64,
    misses: u64,
    expired: u64,
}

impl<V> Default for ResultStore<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
            expired: 0,
        }
    }
}

impl<V> ResultStore<V> {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Get ==
    /// Returns the value for `key` if present and unexpired at `now`.
    ///
    /// An expired entry is removed on the spot and counted as a miss.
    pub fn get(&mut self, key: &str, now: u64) -> Option<Arc<V>> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                let value = Arc::clone(&entry.value);
                self.hits += 1;
                Some(value)
            }
            Some(_) => {
                self.entries.remove(key);
                self.expired += 1;
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    // == Peek ==
    /// Like [`get`](Self::get) but leaves statistics and expired entries untouched.
    pub fn peek(&self, key: &str, now: u64) -> Option<Arc<V>> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| Arc::clone(&entry.value))
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and its TTL.
    pub fn set(&mut self, key: String, value: Arc<V>, now: u64, ttl: Duration) {
        self.entries.insert(key, CacheEntry::new(value, now, ttl));
    }

    // == Remove ==
    /// Removes the entry for `key`. Returns whether one was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Purge Expired ==
    /// Removes all entries expired at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - self.entries.len();
        self.expired += removed as u64;
        removed
    }

    /// Number of physically present entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn expired(&self) -> u64 {
        self.expired
    }
}
