//! In-Flight Registry Module
//!
//! Tracks the one outstanding producer invocation ("episode") per key so that
//! concurrent resolvers can attach to it instead of starting their own.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{AbortHandle, BoxFuture, Shared};

// == Failure ==
/// How an episode ended when it did not produce a value.
#[derive(Debug)]
pub enum Failure<E> {
    /// The producer returned an error, shared by every waiter
    Producer(Arc<E>),
    /// The producer panicked; the panic does not propagate to waiters
    Panicked,
    /// The registration was reclaimed by the sweep and the episode aborted
    Abandoned,
}

impl<E> Clone for Failure<E> {
    fn clone(&self) -> Self {
        match self {
            Failure::Producer(err) => Failure::Producer(Arc::clone(err)),
            Failure::Panicked => Failure::Panicked,
            Failure::Abandoned => Failure::Abandoned,
        }
    }
}

/// Settled result of an episode as seen by every waiter.
pub type Outcome<V, E> = Result<Arc<V>, Failure<E>>;

/// Awaitable handle to an episode; cloning it attaches another waiter.
pub type Episode<V, E> = Shared<BoxFuture<'static, Outcome<V, E>>>;

// == In-Flight Registration ==
/// Registration of a running episode.
pub struct InFlight<V, E> {
    /// Distinguishes this episode from later ones for the same key
    pub id: u64,
    /// Shared handle observed by all waiters
    pub handle: Episode<V, E>,
    /// Clock timestamp at which the episode was registered
    pub started_at: u64,
    /// Aborts the episode, failing its waiters with [`Failure::Abandoned`]
    pub abort: AbortHandle,
}

impl<V, E> std::fmt::Debug for InFlight<V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InFlight")
            .field("id", &self.id)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

// == In-Flight Registry ==
/// Map of key to its single running episode.
///
/// Like the result store, it is not synchronized on its own; the caller holds
/// a lock across each check-and-register.
pub struct InFlightRegistry<V, E> {
    episodes: HashMap<String, InFlight<V, E>>,
    next_id: u64,
    producer_calls: u64,
    coalesced: u64,
    producer_failures: u64,
    stale_reclaimed: u64,
}

impl<V, E> Default for InFlightRegistry<V, E> {
    fn default() -> Self {
        Self {
            episodes: HashMap::new(),
            next_id: 0,
            producer_calls: 0,
            coalesced: 0,
            producer_failures: 0,
            stale_reclaimed: 0,
        }
    }
}

impl<V, E> InFlightRegistry<V, E> {
    pub fn new() -> Self {
        Self::default()
    }

    // == Attach ==
    /// Returns a handle to the running episode for `key`, if any.
    pub fn attach(&mut self, key: &str) -> Option<Episode<V, E>> {
        let handle = self.episodes.get(key).map(|flight| flight.handle.clone())?;
        self.coalesced += 1;
        Some(handle)
    }

    // == Next Id ==
    /// Reserves the identifier for the next episode.
    pub fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // == Register ==
    /// Publishes a new episode under `key`.
    ///
    /// Callers only register after [`attach`](Self::attach) returned `None`
    /// under the same lock, so a key never holds two registrations.
    pub fn register(&mut self, key: String, flight: InFlight<V, E>) {
        debug_assert!(!self.episodes.contains_key(&key));
        self.producer_calls += 1;
        self.episodes.insert(key, flight);
    }

    // == Is Current ==
    /// Whether episode `id` is still the registration for `key`.
    pub fn is_current(&self, key: &str, id: u64) -> bool {
        self.episodes.get(key).is_some_and(|flight| flight.id == id)
    }

    // == Complete ==
    /// Removes the registration for `key` if it still belongs to episode `id`.
    ///
    /// Returns `false` when the episode was already reclaimed and the slot
    /// is empty or owned by a newer episode.
    pub fn complete(&mut self, key: &str, id: u64, failed: bool) -> bool {
        if !self.is_current(key, id) {
            return false;
        }
        self.episodes.remove(key);
        if failed {
            self.producer_failures += 1;
        }
        true
    }

    // == Reclaim Stale ==
    /// Removes every registration whose age at `now` is at least `stale_after_ms`.
    ///
    /// Returns the removed registrations with their keys so the caller can
    /// decide what happens to their waiters.
    pub fn reclaim_stale(&mut self, now: u64, stale_after_ms: u64) -> Vec<(String, InFlight<V, E>)> {
        let stale_keys: Vec<String> = self
            .episodes
            .iter()
            .filter(|(_, flight)| now.saturating_sub(flight.started_at) >= stale_after_ms)
            .map(|(key, _)| key.clone())
            .collect();

        let reclaimed: Vec<(String, InFlight<V, E>)> = stale_keys
            .into_iter()
            .filter_map(|key| self.episodes.remove(&key).map(|flight| (key, flight)))
            .collect();

        self.stale_reclaimed += reclaimed.len() as u64;
        reclaimed
    }

    pub fn contains(&self, key: &str) -> bool {
        self.episodes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn producer_calls(&self) -> u64 {
        self.producer_calls
    }

    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    pub fn producer_failures(&self) -> u64 {
        self.producer_failures
    }

    pub fn stale_reclaimed(&self) -> u64 {
        self.stale_reclaimed
    }
}
