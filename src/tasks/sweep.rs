//! Sweep Task
//!
//! Background task that periodically purges expired entries and reclaims
//! stale in-flight registrations.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::KeyedCache;
use crate::clock::duration_ms;

/// Handle to a running sweep task.
///
/// Dropping the handle stops the task as well; [`shutdown`](Self::shutdown)
/// additionally waits for it to finish.
#[derive(Debug)]
#[must_use = "dropping the handle stops the sweep task"]
pub struct SweepHandle {
    handle: JoinHandle<()>,
    stop: Option<oneshot::Sender<()>>,
}

impl SweepHandle {
    /// Stops the sweep task and waits for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(err) = (&mut self.handle).await {
            debug!(error = %err, "sweep task ended abnormally");
        }
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns a background task that calls [`KeyedCache::sweep`] every `interval`.
///
/// The task holds only a weak reference to the cache and ends on its own
/// once every clone of the cache has been dropped. The first sweep runs one
/// full interval after spawning.
///
/// # Panics
/// Panics if called outside a tokio runtime.
pub fn spawn_sweep_task<V, E>(cache: &KeyedCache<V, E>, interval: Duration) -> SweepHandle
where
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    // tokio intervals reject a zero period
    let interval = interval.max(Duration::from_millis(1));
    let weak = cache.downgrade();
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        info!(interval_ms = duration_ms(interval), "Starting cache sweep task");

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut stop_rx => {
                    info!("Cache sweep task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let Some(cache) = weak.upgrade() else {
                        debug!("Cache dropped, ending sweep task");
                        break;
                    };

                    let report = cache.sweep();
                    if report.is_empty() {
                        debug!("Sweep: nothing to remove");
                    } else {
                        info!(
                            expired = report.expired_entries,
                            stale = report.stale_reclaimed,
                            "Sweep removed entries"
                        );
                    }
                }
            }
        }
    });

    SweepHandle {
        handle,
        stop: Some(stop_tx),
    }
}
