//! TTL Cleanup Task
//!
//! Background task that periodically sweeps stale cache entries until it
//! is told to stop.

use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::CacheCore;

// == Cleanup Handle ==
/// Stop switch for a running cleanup task.
///
/// Stopping is a one-way `Running → Stopped` transition: the first call to
/// [`stop`](Self::stop) sends the shutdown signal, every later or
/// concurrent call is a no-op.
#[derive(Debug)]
pub(crate) struct CleanupHandle {
    stopped: AtomicBool,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CleanupHandle {
    /// Requests shutdown. Returns true only for the call that performed it.
    pub(crate) fn stop(&self) -> bool {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return false;
        }
        // The task may already be gone if the cache was dropped
        let _ = self.shutdown_tx.send(true);
        true
    }

    /// Returns true once shutdown has been requested.
    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Returns true once the task has exited its loop.
    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a background task that sweeps stale entries every `interval`.
///
/// The first sweep runs one full interval after spawning. The task holds
/// only a weak reference to the cache, so it also exits on its own once
/// the cache is gone.
///
/// # Returns
/// A [`CleanupHandle`] used to stop the task during shutdown.
pub(crate) fn spawn_cleanup_task<K, V>(
    cache: Weak<CacheCore<K, V>>,
    interval: Duration,
) -> CleanupHandle
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting TTL cleanup task"
        );

        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let Some(cache) = cache.upgrade() else {
                        break;
                    };
                    let removed = cache.sweep_expired().await;

                    if removed > 0 {
                        info!("TTL cleanup: removed {} expired entries", removed);
                    } else {
                        debug!("TTL cleanup: no expired entries found");
                    }
                }
            }
        }

        info!("TTL cleanup task stopped");
    });

    CleanupHandle {
        stopped: AtomicBool::new(false),
        shutdown_tx,
        task,
    }
}
