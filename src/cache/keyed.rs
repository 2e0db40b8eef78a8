//! Keyed Cache Module
//!
//! Combines the result store and the in-flight registry into a single-flight
//! cache: concurrent `resolve` calls for one key share one producer run.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::future::{self, AbortHandle, FutureExt};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::cache::flight::{Episode, Failure, InFlight, InFlightRegistry, Outcome};
use crate::cache::{CacheStats, ResultStore, SweepReport};
use crate::clock::{duration_ms, Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::ResolveError;
use crate::tasks::{spawn_sweep_task, SweepHandle};

// == Keyed Cache ==
/// TTL cache with per-key request coalescing.
///
/// Cloning is cheap and every clone refers to the same maps, so the host can
/// build one instance and hand clones to each collaborator.
///
/// # Example
/// ```ignore
/// let cache: KeyedCache<User, ApiError> = KeyedCache::new(CacheConfig::default());
/// let sweeper = cache.init();
/// let user = cache.resolve("user:42", || fetch_user(42), None).await?;
/// sweeper.shutdown().await;
/// ```
pub struct KeyedCache<V, E> {
    inner: Arc<Inner<V, E>>,
}

struct Inner<V, E> {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    // Lock order: `flights` before `store`. Nothing acquires `flights` while holding `store`.
    store: Mutex<ResultStore<V>>,
    flights: Mutex<InFlightRegistry<V, E>>,
}

impl<V, E> Clone for KeyedCache<V, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V, E> std::fmt::Debug for KeyedCache<V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let in_flight = self.inner.flights.lock().len();
        let entries = self.inner.store.lock().len();
        f.debug_struct("KeyedCache")
            .field("config", &self.inner.config)
            .field("clock", &self.inner.clock)
            .field("entries", &entries)
            .field("in_flight", &in_flight)
            .finish()
    }
}

impl<V, E> KeyedCache<V, E>
where
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    // == Constructors ==
    /// Creates an empty cache driven by the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Creates an empty cache driven by `clock`.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                clock,
                store: Mutex::new(ResultStore::new()),
                flights: Mutex::new(InFlightRegistry::new()),
            }),
        }
    }

    // == Lifecycle ==
    /// Starts the periodic sweep on the current tokio runtime.
    ///
    /// The sweep runs every [`CacheConfig::sweep_interval`] until the returned
    /// handle is shut down or dropped, or until every clone of this cache is gone.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn init(&self) -> SweepHandle {
        spawn_sweep_task(self, self.inner.config.sweep_interval)
    }

    // == Get ==
    /// Returns the cached value for `key` if it has not expired.
    ///
    /// An expired entry found here is removed immediately. In-flight
    /// episodes are not consulted.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        let now = self.inner.clock.now_ms();
        self.inner.store.lock().get(key, now)
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl` (or the default TTL), replacing
    /// any existing entry. In-flight state is left alone.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.inner.store_value(key.into(), Arc::new(value), ttl);
    }

    // == Invalidate ==
    /// Removes the entry for `key`. Returns whether an entry was present.
    ///
    /// A running episode for `key` is not cancelled and will still store
    /// its result when it succeeds.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.inner.store.lock().remove(key);
        if removed {
            debug!(key, "invalidated cache entry");
        }
        removed
    }

    /// Removes every entry from the result store and returns how many were dropped.
    pub fn invalidate_all(&self) -> usize {
        let removed = self.inner.store.lock().clear();
        debug!(removed, "invalidated all cache entries");
        removed
    }

    // == Resolve ==
    /// Returns the value for `key`, running `producer` at most once across
    /// all concurrent callers.
    ///
    /// 1. A cached, unexpired value is returned without calling `producer`.
    /// 2. If another call is already producing `key`, this call waits for
    ///    that outcome and `producer` is dropped unused.
    /// 3. Otherwise this call registers a new episode and runs `producer`.
    ///    A success is stored for `ttl` (or the default TTL) and handed to
    ///    every waiter as the same `Arc`; a failure is handed to every
    ///    waiter as the same `Arc<E>` and nothing is cached. A panicking
    ///    producer is reported as [`ResolveError::Panicked`] the same way.
    ///
    /// Any waiter polling the episode drives it, so dropping the first caller
    /// does not strand the others.
    pub async fn resolve<F, Fut>(
        &self,
        key: impl Into<String>,
        producer: F,
        ttl: Option<Duration>,
    ) -> Result<Arc<V>, ResolveError<E>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let key = key.into();
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let episode = {
            let mut flights = self.inner.flights.lock();
            match flights.attach(&key) {
                Some(handle) => {
                    debug!(key = %key, "attaching to in-flight request");
                    handle
                }
                None => {
                    let now = self.inner.clock.now_ms();
                    // An episode may have settled between the lookup above and taking the lock.
                    if let Some(value) = self.inner.store.lock().peek(&key, now) {
                        return Ok(value);
                    }

                    let id = flights.next_id();
                    let (handle, abort) = self.start_episode(key.clone(), id, producer, ttl);
                    flights.register(
                        key.clone(),
                        InFlight {
                            id,
                            handle: handle.clone(),
                            started_at: now,
                            abort,
                        },
                    );
                    debug!(key = %key, episode = id, "starting producer");
                    handle
                }
            }
        };

        episode.await.map_err(|failure| match failure {
            Failure::Producer(source) => ResolveError::Producer { key, source },
            Failure::Panicked => ResolveError::Panicked { key },
            Failure::Abandoned => ResolveError::Abandoned {
                key,
                stale_after: self.inner.config.stale_threshold,
            },
        })
    }

    /// Wraps `producer` into an abortable, shareable episode.
    ///
    /// The producer is not called until the first waiter polls the episode,
    /// which only happens after the registration is published.
    fn start_episode<F, Fut>(
        &self,
        key: String,
        id: u64,
        producer: F,
        ttl: Option<Duration>,
    ) -> (Episode<V, E>, AbortHandle)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        // Weak so a never-settling episode cannot keep the cache alive through its own registry.
        let inner = Arc::downgrade(&self.inner);
        let work = async move {
            let produced = AssertUnwindSafe(async move { producer().await })
                .catch_unwind()
                .await;
            let outcome: Outcome<V, E> = match produced {
                Ok(Ok(value)) => Ok(Arc::new(value)),
                Ok(Err(err)) => Err(Failure::Producer(Arc::new(err))),
                Err(_panic) => Err(Failure::Panicked),
            };
            if let Some(inner) = inner.upgrade() {
                inner.settle(&key, id, &outcome, ttl);
            }
            outcome
        };

        let (work, abort) = future::abortable(work);
        let handle = work
            .map(|result| result.unwrap_or_else(|_aborted| Err(Failure::Abandoned)))
            .boxed()
            .shared();
        (handle, abort)
    }

    // == Sweep ==
    /// Purges expired entries and reclaims stale in-flight registrations.
    ///
    /// A registration is stale once it has been outstanding for at least
    /// [`CacheConfig::stale_threshold`]. Its slot is freed so the next
    /// `resolve` starts over; when [`CacheConfig::fail_abandoned_waiters`]
    /// is set, callers still waiting on it receive [`ResolveError::Abandoned`].
    pub fn sweep(&self) -> SweepReport {
        let now = self.inner.clock.now_ms();
        let expired_entries = self.inner.store.lock().purge_expired(now);
        let stale = self
            .inner
            .flights
            .lock()
            .reclaim_stale(now, duration_ms(self.inner.config.stale_threshold));

        for (key, flight) in &stale {
            warn!(
                key = %key,
                episode = flight.id,
                age_ms = now.saturating_sub(flight.started_at),
                "reclaiming stale in-flight request"
            );
            if self.inner.config.fail_abandoned_waiters {
                flight.abort.abort();
            }
        }

        SweepReport {
            expired_entries,
            stale_reclaimed: stale.len(),
        }
    }

    // == Introspection ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        let (producer_calls, coalesced, producer_failures, stale_reclaimed, in_flight) = {
            let flights = self.inner.flights.lock();
            (
                flights.producer_calls(),
                flights.coalesced(),
                flights.producer_failures(),
                flights.stale_reclaimed(),
                flights.len(),
            )
        };
        let store = self.inner.store.lock();

        CacheStats {
            hits: store.hits(),
            misses: store.misses(),
            expired: store.expired(),
            producer_calls,
            coalesced,
            producer_failures,
            stale_reclaimed,
            entries: store.len(),
            in_flight,
        }
    }

    /// Whether an episode for `key` is currently registered.
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.inner.flights.lock().contains(key)
    }

    /// Number of registered episodes.
    pub fn in_flight_len(&self) -> usize {
        self.inner.flights.lock().len()
    }

    /// Number of entries physically held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.store.lock().is_empty()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    pub(crate) fn downgrade(&self) -> WeakKeyedCache<V, E> {
        WeakKeyedCache {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl<V, E> Inner<V, E>
where
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    fn store_value(&self, key: String, value: Arc<V>, ttl: Option<Duration>) {
        let now = self.clock.now_ms();
        let ttl = ttl.unwrap_or(self.config.default_ttl);
        self.store.lock().set(key, value, now, ttl);
    }

    /// Records the outcome of episode `id`.
    ///
    /// The result is written and the registration removed under the registry
    /// lock, so no resolver can observe the slot empty before the value lands.
    /// An episode whose registration was reclaimed leaves both maps untouched.
    fn settle(&self, key: &str, id: u64, outcome: &Outcome<V, E>, ttl: Option<Duration>) {
        let mut flights = self.flights.lock();
        if !flights.is_current(key, id) {
            debug!(key, episode = id, "episode settled after its registration was reclaimed");
            return;
        }

        match outcome {
            Ok(value) => {
                self.store_value(key.to_string(), Arc::clone(value), ttl);
                flights.complete(key, id, false);
                debug!(key, episode = id, "producer succeeded");
            }
            Err(Failure::Panicked) => {
                flights.complete(key, id, true);
                warn!(key, episode = id, "producer panicked");
            }
            Err(_) => {
                flights.complete(key, id, true);
                warn!(key, episode = id, "producer failed");
            }
        }
    }
}

// == Weak Handle ==
/// Non-owning handle used by the background sweep.
pub(crate) struct WeakKeyedCache<V, E> {
    inner: Weak<Inner<V, E>>,
}

impl<V, E> WeakKeyedCache<V, E> {
    pub(crate) fn upgrade(&self) -> Option<KeyedCache<V, E>> {
        self.inner.upgrade().map(|inner| KeyedCache { inner })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use futures::future::join_all;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;
    use tokio_test::{assert_pending, assert_ready_err, assert_ready_ok, task};

    #[derive(Debug, thiserror::Error)]
    #[error("test failure: {0}")]
    struct TestError(&'static str);

    fn manual_cache(config: CacheConfig) -> (KeyedCache<u32, TestError>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = KeyedCache::with_clock(config, clock.clone());
        (cache, clock)
    }

    fn never() -> std::future::Pending<Result<u32, TestError>> {
        std::future::pending()
    }

    async fn exploding(release: oneshot::Receiver<()>) -> Result<u32, TestError> {
        let _ = release.await;
        panic!("producer exploded")
    }

    // == Result Store Operations ==

    #[test]
    fn test_set_and_get() {
        let (cache, _) = manual_cache(CacheConfig::default());

        cache.set("a", 1, None);
        assert_eq!(*cache.get("a").unwrap(), 1);
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_expiry_after_ttl() {
        let (cache, clock) = manual_cache(CacheConfig::default());

        cache.set("key", 1, Some(Duration::from_millis(10)));
        clock.advance(Duration::from_millis(15));

        assert!(cache.get("key").is_none());
        assert!(cache.is_empty(), "expired entry should be removed lazily");
    }

    #[test]
    fn test_default_ttl_applies() {
        let (cache, clock) = manual_cache(CacheConfig::default());

        cache.set("key", 1, None);
        clock.advance(Duration::from_millis(299_999));
        assert!(cache.get("key").is_some());

        clock.advance(Duration::from_millis(1));
        assert!(cache.get("key").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let (cache, _) = manual_cache(CacheConfig::default());

        cache.set("key", 1, None);
        cache.set("key", 2, None);
        assert_eq!(*cache.get("key").unwrap(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate() {
        let (cache, _) = manual_cache(CacheConfig::default());

        cache.set("a", 1, None);
        assert!(cache.invalidate("a"));
        assert!(cache.get("a").is_none());
        assert!(!cache.invalidate("a"));
    }

    #[test]
    fn test_invalidate_all() {
        let (cache, _) = manual_cache(CacheConfig::default());

        cache.set("a", 1, None);
        cache.set("b", 2, None);
        assert_eq!(cache.invalidate_all(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let (cache, _) = manual_cache(CacheConfig::default());
        let other = cache.clone();

        cache.set("a", 1, None);
        assert_eq!(*other.get("a").unwrap(), 1);
    }

    // == Resolve ==

    #[tokio::test]
    async fn test_resolve_caches_result() {
        let (cache, _) = manual_cache(CacheConfig::default());

        let value = cache.resolve("key", || async { Ok(7) }, None).await.unwrap();
        assert_eq!(*value, 7);
        assert!(!cache.is_in_flight("key"));

        let cached = cache.get("key").unwrap();
        assert!(Arc::ptr_eq(&value, &cached));
    }

    #[tokio::test]
    async fn test_resolve_hit_skips_producer() {
        let (cache, _) = manual_cache(CacheConfig::default());
        cache.set("key", 1, None);

        let value = cache.resolve("key", never, None).await.unwrap();
        assert_eq!(*value, 1);
        assert_eq!(cache.stats().producer_calls, 0);
    }

    #[tokio::test]
    async fn test_resolve_uses_per_call_ttl() {
        let (cache, clock) = manual_cache(CacheConfig::default());

        cache
            .resolve("key", || async { Ok(1) }, Some(Duration::from_millis(10)))
            .await
            .unwrap();
        clock.advance(Duration::from_millis(15));

        assert!(cache.get("key").is_none());
    }

    #[tokio::test]
    async fn test_concurrent_resolves_share_one_producer() {
        let (cache, _) = manual_cache(CacheConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let futures = (0..10).map(|_| {
            let calls = Arc::clone(&calls);
            cache.resolve(
                "key",
                move || async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                },
                None,
            )
        });
        let results = join_all(futures).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let first = results[0].as_ref().unwrap();
        for result in &results {
            assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
        }

        let stats = cache.stats();
        assert_eq!(stats.producer_calls, 1);
        assert_eq!(stats.coalesced, 9);
        assert_eq!(stats.in_flight, 0);
    }

    #[tokio::test]
    async fn test_failure_shared_and_not_cached() {
        let (cache, _) = manual_cache(CacheConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let futures = (0..5).map(|_| {
            let calls = Arc::clone(&calls);
            cache.resolve(
                "key",
                move || async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(TestError("boom"))
                },
                None,
            )
        });
        let results = join_all(futures).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let first = results[0].as_ref().unwrap_err();
        assert_eq!(first.key(), "key");
        let source = first.producer_error().unwrap();
        for result in &results {
            let err = result.as_ref().unwrap_err();
            assert!(Arc::ptr_eq(source, err.producer_error().unwrap()));
        }
        assert!(cache.get("key").is_none());
        assert!(!cache.is_in_flight("key"));
        assert_eq!(cache.stats().producer_failures, 1);

        // A fresh call starts a new episode
        let value = cache.resolve("key", || async { Ok(3) }, None).await.unwrap();
        assert_eq!(*value, 3);
        assert_eq!(cache.stats().producer_calls, 2);
    }

    #[tokio::test]
    async fn test_panicking_producer_frees_slot() {
        let (cache, _) = manual_cache(CacheConfig::default());
        let (tx, rx) = oneshot::channel::<()>();

        let mut driver = task::spawn(cache.resolve(
            "key",
            move || exploding(rx),
            None,
        ));
        assert_pending!(driver.poll());
        let mut attached = task::spawn(cache.resolve("key", never, None));
        assert_pending!(attached.poll());

        tx.send(()).unwrap();
        assert!(assert_ready_err!(driver.poll()).is_panicked());
        assert!(assert_ready_err!(attached.poll()).is_panicked());
        assert!(!cache.is_in_flight("key"));
        assert!(cache.get("key").is_none());

        let value = cache.resolve("key", || async { Ok(8) }, None).await.unwrap();
        assert_eq!(*value, 8);
        assert_eq!(cache.stats().producer_failures, 1);
    }

    #[tokio::test]
    async fn test_independent_keys_do_not_block() {
        let (cache, _) = manual_cache(CacheConfig::default());

        let mut blocked = task::spawn(cache.resolve("a", never, None));
        assert_pending!(blocked.poll());

        let value = cache.resolve("b", || async { Ok(2) }, None).await.unwrap();
        assert_eq!(*value, 2);
        assert!(cache.is_in_flight("a"));
    }

    #[tokio::test]
    async fn test_dropped_driver_does_not_strand_followers() {
        let (cache, _) = manual_cache(CacheConfig::default());
        let (tx, rx) = oneshot::channel();

        let mut driver = task::spawn(cache.resolve(
            "key",
            move || async move { Ok(rx.await.unwrap_or(0)) },
            None,
        ));
        assert_pending!(driver.poll());

        let mut follower = task::spawn(cache.resolve("key", never, None));
        assert_pending!(follower.poll());

        drop(driver);
        tx.send(5).unwrap();

        let value = assert_ready_ok!(follower.poll());
        assert_eq!(*value, 5);
        assert_eq!(*cache.get("key").unwrap(), 5);
    }

    #[tokio::test]
    async fn test_invalidate_all_keeps_running_episode() {
        let (cache, _) = manual_cache(CacheConfig::default());
        let (tx, rx) = oneshot::channel();

        let mut pending = task::spawn(cache.resolve(
            "key",
            move || async move { Ok(rx.await.unwrap_or(0)) },
            None,
        ));
        assert_pending!(pending.poll());

        cache.set("other", 1, None);
        cache.invalidate_all();
        assert!(cache.get("other").is_none());
        assert!(cache.is_in_flight("key"));

        tx.send(9).unwrap();
        assert_eq!(*assert_ready_ok!(pending.poll()), 9);
        assert_eq!(*cache.get("key").unwrap(), 9);
    }

    // == Sweep ==

    #[test]
    fn test_sweep_purges_expired_entries() {
        let (cache, clock) = manual_cache(CacheConfig::default());

        cache.set("short", 1, Some(Duration::from_millis(10)));
        cache.set("long", 2, Some(Duration::from_secs(60)));
        clock.advance(Duration::from_millis(15));

        let report = cache.sweep();
        assert_eq!(report.expired_entries, 1);
        assert_eq!(report.stale_reclaimed, 0);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().expired, 1);
    }

    #[tokio::test]
    async fn test_sweep_leaves_young_episode() {
        let (cache, clock) = manual_cache(CacheConfig::default());

        let mut pending = task::spawn(cache.resolve("key", never, None));
        assert_pending!(pending.poll());

        clock.advance(Duration::from_secs(29));
        assert!(cache.sweep().is_empty());
        assert!(cache.is_in_flight("key"));
    }

    #[tokio::test]
    async fn test_sweep_reclaims_stale_episode_and_fails_waiters() {
        let (cache, clock) = manual_cache(CacheConfig::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let counted = Arc::clone(&calls);
        let mut stuck = task::spawn(cache.resolve(
            "key",
            move || {
                counted.fetch_add(1, Ordering::SeqCst);
                never()
            },
            None,
        ));
        assert_pending!(stuck.poll());
        let mut attached = task::spawn(cache.resolve("key", never, None));
        assert_pending!(attached.poll());

        clock.advance(Duration::from_secs(30));
        let report = cache.sweep();
        assert_eq!(report.stale_reclaimed, 1);
        assert!(!cache.is_in_flight("key"));

        let err = assert_ready_err!(stuck.poll());
        assert!(err.is_abandoned());
        assert_eq!(err.key(), "key");
        assert!(assert_ready_err!(attached.poll()).is_abandoned());

        // The freed slot lets a new producer run
        let value = cache.resolve("key", || async { Ok(4) }, None).await.unwrap();
        assert_eq!(*value, 4);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().producer_calls, 2);
        assert_eq!(cache.stats().stale_reclaimed, 1);
    }

    #[tokio::test]
    async fn test_sweep_can_leave_waiters_attached() {
        let config = CacheConfig::default().with_fail_abandoned_waiters(false);
        let (cache, clock) = manual_cache(config);
        let (tx, rx) = oneshot::channel();

        let mut stuck = task::spawn(cache.resolve(
            "key",
            move || async move { Ok(rx.await.unwrap_or(0)) },
            None,
        ));
        assert_pending!(stuck.poll());

        clock.advance(Duration::from_secs(31));
        assert_eq!(cache.sweep().stale_reclaimed, 1);
        assert_pending!(stuck.poll());

        let fresh = cache.resolve("key", || async { Ok(2) }, None).await.unwrap();
        assert_eq!(*fresh, 2);

        // The reclaimed episode still reaches its own waiters but does not overwrite the store
        tx.send(1).unwrap();
        assert_eq!(*assert_ready_ok!(stuck.poll()), 1);
        assert_eq!(*cache.get("key").unwrap(), 2);
    }

    #[tokio::test]
    async fn test_episode_does_not_keep_cache_alive() {
        let (cache, _) = manual_cache(CacheConfig::default());
        let weak = cache.downgrade();

        let mut pending = task::spawn(cache.resolve("key", never, None));
        assert_pending!(pending.poll());
        drop(pending);
        drop(cache);

        assert!(weak.upgrade().is_none());
    }
}
