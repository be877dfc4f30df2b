//! Polling scheduler driving the reconciliation pipeline.
//!
//! A single tokio task owns the whole pipeline: fetch a snapshot pair,
//! reconcile, evaluate alerts, project stats, publish. Cycles never overlap;
//! the cadence is a fixed delay measured from cycle completion to the next
//! cycle start (never fixed-rate, which would pile up cycles behind a slow
//! network). Consumers observe fully-replaced immutable [`FleetUpdate`]
//! values through a watch channel.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::alert::{AlertEvent, AlertTracker};
use crate::data::{FleetStats, FleetView};
use crate::source::{FetchError, SnapshotSource};

/// Default delay between the end of one poll cycle and the start of the next.
pub const DEFAULT_CADENCE: Duration = Duration::from_secs(2);

/// One cycle's published state for the presentation boundary.
///
/// On a failed cycle the previous view and stats are retained unchanged and
/// `error` carries the failure; `alerts` is empty since no fresh snapshot was
/// evaluated.
#[derive(Debug, Clone, Default)]
pub struct FleetUpdate {
    /// The reconciled view, or `None` before the first successful cycle.
    pub view: Option<FleetView>,
    pub stats: FleetStats,
    pub alerts: Vec<AlertEvent>,
    /// Set when the last cycle failed; rendered as a persistent banner.
    pub error: Option<FetchError>,
    /// Settled cycle count, successful or not.
    pub cycle: u64,
}

/// The polling scheduler.
pub struct Watcher<S> {
    source: S,
    cadence: Duration,
}

impl<S: SnapshotSource + 'static> Watcher<S> {
    /// Create a watcher with the default 2-second cadence.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cadence: DEFAULT_CADENCE,
        }
    }

    /// Set the cadence (delay from cycle completion to next cycle start).
    pub fn cadence(mut self, cadence: Duration) -> Self {
        self.cadence = cadence;
        self
    }

    /// Start polling in a background task.
    ///
    /// Returns the update channel and a handle for clean shutdown. Fetch
    /// failures are absorbed: an unreachable server is reported and retried
    /// on the next tick. The loop exits on its own only when authentication
    /// is rejected, since retrying without a fresh credential would be a 401
    /// storm; the session token has already been invalidated by then.
    pub fn start(self) -> (watch::Receiver<FleetUpdate>, WatcherHandle) {
        let (tx, rx) = watch::channel(FleetUpdate::default());
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let source = self.source;
        let cadence = self.cadence;

        tokio::spawn(async move {
            let mut tracker = AlertTracker::new();
            let mut last_view: Option<FleetView> = None;
            let mut last_stats = FleetStats::default();
            let mut cycle: u64 = 0;

            loop {
                // One cycle. If stop arrives mid-fetch the in-flight result
                // is dropped, not acted upon.
                let settled = tokio::select! {
                    result = source.fetch_snapshot() => result,
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                        continue;
                    }
                };
                cycle += 1;

                match settled {
                    Ok((machines, readings)) => {
                        let view = FleetView::reconcile(machines, readings);
                        let stats = FleetStats::project(&view);
                        let alerts = tracker.evaluate(&view);
                        debug!(
                            cycle,
                            machines = view.len(),
                            alerts = alerts.len(),
                            "poll cycle complete"
                        );
                        last_view = Some(view.clone());
                        last_stats = stats;
                        let _ = tx.send(FleetUpdate {
                            view: Some(view),
                            stats,
                            alerts,
                            error: None,
                            cycle,
                        });
                    }
                    Err(err) => {
                        warn!(cycle, error = %err, "poll cycle failed");
                        let fatal = matches!(err, FetchError::Unauthorized);
                        let _ = tx.send(FleetUpdate {
                            view: last_view.clone(),
                            stats: last_stats,
                            alerts: Vec::new(),
                            error: Some(err),
                            cycle,
                        });
                        if fatal {
                            break;
                        }
                    }
                }

                // Fixed delay from completion, cancelled on stop
                tokio::select! {
                    _ = tokio::time::sleep(cadence) => {}
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        (rx, WatcherHandle { stop_tx })
    }
}

/// Handle for stopping a running watcher.
///
/// Call [`stop`](WatcherHandle::stop) explicitly, or drop the handle; either
/// way the timer is cancelled and no further cycles start.
pub struct WatcherHandle {
    stop_tx: watch::Sender<bool>,
}

impl WatcherHandle {
    /// Stop polling. Any in-flight fetch result is discarded.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }
}
