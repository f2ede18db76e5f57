//! Sensor polling with change detection.
//!
//! [`SensorPoller`] fetches the latest reading on a fixed interval, compares it
//! with the last accepted snapshot and pushes the result into a
//! [`DashboardView`].
//!
//! A cycle ends in one of three ways:
//!
//! - **Updated** - the reading differs from the last snapshot (or there is
//!   none yet). Every metric, the timestamp and a `Connected` indicator are
//!   pushed, and the reading becomes the new snapshot.
//! - **Unchanged** - the reading repeats the snapshot and the stale-reading
//!   rule is disabled. Metrics are left alone, the indicator stays connected.
//! - **Offline** - the fetch failed, the body was malformed, the backend
//!   reported the sensor disconnected, or the reading repeated the snapshot
//!   while the stale-reading rule is enabled (the default). Only the indicator
//!   changes.
//!
//! Nothing is retried; the next tick starts over.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hapag_core::{DashboardClient, RecordingView, SensorPoller, SensorPollerOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(DashboardClient::new("http://localhost:5000")?);
//! let view = Arc::new(RecordingView::new());
//!
//! let mut poller = SensorPoller::new(client, view.clone(), SensorPollerOptions::default())?;
//! poller.start();
//! // ...
//! poller.stop();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use hapag_types::{SensorSnapshot, has_changed};

use crate::error::{Error, Result};
use crate::schedule::PeriodicTask;
use crate::traits::DashboardSource;
use crate::view::{ConnectionState, DashboardView, MetricDisplay};

/// Default sensor polling interval.
pub const DEFAULT_SENSOR_INTERVAL: Duration = Duration::from_secs(10);

/// Why a cycle left the dashboard offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflineReason {
    /// The request failed or the backend returned an error status.
    Transport,
    /// The body did not have the expected shape.
    Malformed,
    /// The backend reported `connected: false`.
    SensorDisconnected,
    /// The reading repeated the last snapshot.
    StaleReading,
}

impl OfflineReason {
    pub fn description(&self) -> &'static str {
        match self {
            OfflineReason::Transport => "backend unreachable",
            OfflineReason::Malformed => "unexpected response from backend",
            OfflineReason::SensorDisconnected => "sensor disconnected",
            OfflineReason::StaleReading => "no new reading since last poll",
        }
    }
}

/// Result of one polling cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollOutcome {
    Updated,
    Unchanged,
    Offline(OfflineReason),
}

impl PollOutcome {
    /// Indicator state this outcome produces.
    pub fn connection_state(&self) -> ConnectionState {
        match self {
            PollOutcome::Updated | PollOutcome::Unchanged => ConnectionState::Connected,
            PollOutcome::Offline(_) => ConnectionState::Offline,
        }
    }
}

/// Options for [`SensorPoller`].
#[derive(Debug, Clone)]
pub struct SensorPollerOptions {
    /// Time between cycles. Default: 10 seconds.
    pub interval: Duration,
    /// Treat a reading identical to the last snapshot as a stalled sensor.
    ///
    /// Default: `true`. A healthy sensor whose values hold steady will show
    /// as offline while this is enabled.
    pub stale_as_offline: bool,
}

impl Default for SensorPollerOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SENSOR_INTERVAL,
            stale_as_offline: true,
        }
    }
}

impl SensorPollerOptions {
    /// Create options with a specific interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Set whether unchanged readings mark the sensor offline.
    #[must_use]
    pub fn stale_as_offline(mut self, enabled: bool) -> Self {
        self.stale_as_offline = enabled;
        self
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::InvalidConfig("interval must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Periodically synchronizes the view with the backend's latest reading.
///
/// Owns its timer task and the last accepted snapshot. Dropping the poller
/// stops the task.
pub struct SensorPoller {
    sync: Arc<SensorSync>,
    interval: Duration,
    task: Option<PeriodicTask>,
}

impl SensorPoller {
    /// Create a stopped poller.
    ///
    /// Fails with [`Error::InvalidConfig`] if the options do not validate.
    pub fn new(
        source: Arc<dyn DashboardSource>,
        view: Arc<dyn DashboardView>,
        options: SensorPollerOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            sync: Arc::new(SensorSync {
                source,
                view,
                stale_as_offline: options.stale_as_offline,
                state: Mutex::new(SyncState::default()),
            }),
            interval: options.interval,
            task: None,
        })
    }

    /// Start polling. The first cycle runs immediately.
    ///
    /// Returns `false` without doing anything if the poller is already
    /// running. Must be called from within a tokio runtime.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        info!("Starting sensor poller (interval: {:?})", self.interval);
        let sync = Arc::clone(&self.sync);
        self.task = Some(PeriodicTask::spawn("sensor poller", self.interval, move || {
            let sync = Arc::clone(&sync);
            async move {
                sync.run_cycle().await;
            }
        }));
        true
    }

    /// Stop polling. Returns `false` if the poller was not running.
    pub fn stop(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                let was_running = task.is_running();
                task.cancel();
                if was_running {
                    info!("Stopped sensor poller");
                }
                was_running
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(PeriodicTask::is_running)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one cycle now, independent of the timer.
    ///
    /// Waits for an in-flight timer cycle to finish first.
    pub async fn refresh(&self) -> PollOutcome {
        self.sync.run_cycle().await
    }

    /// The last accepted snapshot, if any.
    pub async fn last_snapshot(&self) -> Option<SensorSnapshot> {
        self.sync.state.lock().await.last.clone()
    }
}

impl std::fmt::Debug for SensorPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorPoller")
            .field("interval", &self.interval)
            .field("stale_as_offline", &self.sync.stale_as_offline)
            .field("running", &self.is_running())
            .finish()
    }
}

struct SensorSync {
    source: Arc<dyn DashboardSource>,
    view: Arc<dyn DashboardView>,
    stale_as_offline: bool,
    state: Mutex<SyncState>,
}

#[derive(Default)]
struct SyncState {
    last: Option<SensorSnapshot>,
    consecutive_failures: u32,
}

impl SensorSync {
    async fn run_cycle(&self) -> PollOutcome {
        // Held for the whole cycle so manual refreshes and timer ticks never
        // interleave.
        let mut state = self.state.lock().await;

        let fetched = self
            .source
            .fetch_snapshot()
            .await
            .and_then(|response| response.into_snapshot().map_err(Error::from));

        let outcome = match fetched {
            Ok(Some(snapshot)) => {
                state.consecutive_failures = 0;
                self.apply(&mut state, snapshot)
            }
            Ok(None) => {
                state.consecutive_failures = 0;
                debug!("Backend reports sensor disconnected");
                PollOutcome::Offline(OfflineReason::SensorDisconnected)
            }
            Err(e) => {
                state.consecutive_failures += 1;
                log_failure(&e, state.consecutive_failures);
                PollOutcome::Offline(e.offline_reason())
            }
        };

        self.view.set_connection_state(outcome.connection_state());
        outcome
    }

    fn apply(&self, state: &mut SyncState, snapshot: SensorSnapshot) -> PollOutcome {
        let previous = state.last.as_ref().map(|s| &s.readings);
        if !has_changed(previous, &snapshot.readings) {
            debug!("Sensor reading unchanged");
            return if self.stale_as_offline {
                PollOutcome::Offline(OfflineReason::StaleReading)
            } else {
                PollOutcome::Unchanged
            };
        }

        for (parameter, value) in snapshot.readings.iter() {
            self.view.set_metric(&MetricDisplay::new(parameter, value));
        }
        if let Some(timestamp) = &snapshot.timestamp {
            self.view.set_timestamp(timestamp);
        }

        debug!(
            "Sensor reading updated: N={} P={} K={} pH={} humidity={}",
            snapshot.readings.nitrogen,
            snapshot.readings.phosphorus,
            snapshot.readings.potassium,
            snapshot.readings.ph,
            snapshot.readings.humidity
        );
        state.last = Some(snapshot);
        PollOutcome::Updated
    }
}

fn log_failure(e: &Error, consecutive_failures: u32) {
    if consecutive_failures <= 3 {
        warn!(
            "Failed to refresh sensor reading: {} (attempt {})",
            e, consecutive_failures
        );
    } else if consecutive_failures == 4 {
        error!(
            "Failed to refresh sensor reading after {} attempts, will continue trying silently",
            consecutive_failures
        );
    } else {
        debug!("Failed to refresh sensor reading: {}", e);
    }
}
