//! Forecast alerts.
//!
//! [`build_report`] turns the backend's per-sensor predictions into a
//! [`ForecastReport`]: one line per sensor with a 24 hour prediction, each
//! carrying the most urgent alert available. [`ForecastPoller`] fetches and
//! renders a report on a fixed interval (5 minutes by default).
//!
//! A failed fetch is logged and the previously rendered report stays on
//! screen.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use hapag_types::{ForecastSet, Horizon, Trend};

use crate::error::{Error, Result};
use crate::schedule::PeriodicTask;
use crate::traits::DashboardSource;
use crate::view::DashboardView;

/// Default forecast polling interval.
pub const DEFAULT_FORECAST_INTERVAL: Duration = Duration::from_secs(300);

/// Heading of the forecast panel.
pub const FORECAST_TITLE: &str = "Predictions (Next 24-72 Hours)";

/// Message shown when no sensor carries an alert.
pub const ALL_CLEAR_MESSAGE: &str = "All sensors within safe ranges";

/// How urgent a forecast alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Raised by the 72 hour horizon.
    Medium,
    /// Raised by the 24 hour horizon.
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastAlert {
    pub severity: AlertSeverity,
    pub message: String,
}

/// One rendered sensor prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastLine {
    pub sensor: String,
    pub current: f64,
    pub predicted: f64,
    pub change: f64,
    pub trend: Trend,
    pub alert: Option<ForecastAlert>,
}

impl ForecastLine {
    /// `N: 90.0 → 95.0 (+5.0) ↗`
    pub fn summary(&self) -> String {
        format!(
            "{}: {:.1} → {:.1} ({}) {}",
            self.sensor,
            self.current,
            self.predicted,
            format_change(self.change),
            self.trend.arrow()
        )
    }
}

/// Rendered forecast panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastReport {
    /// Lines in the order the backend listed the sensors.
    pub lines: Vec<ForecastLine>,
}

impl ForecastReport {
    /// True when no line carries an alert.
    pub fn all_clear(&self) -> bool {
        self.lines.iter().all(|l| l.alert.is_none())
    }

    /// Lines that carry an alert.
    pub fn alerts(&self) -> impl Iterator<Item = (&ForecastLine, &ForecastAlert)> {
        self.lines
            .iter()
            .filter_map(|l| l.alert.as_ref().map(|a| (l, a)))
    }
}

/// Format a change with one decimal, prefixing `+` when strictly positive.
///
/// ```
/// use hapag_core::forecast::format_change;
///
/// assert_eq!(format_change(5.0), "+5.0");
/// assert_eq!(format_change(-2.24), "-2.2");
/// assert_eq!(format_change(0.0), "0.0");
/// ```
pub fn format_change(change: f64) -> String {
    if change > 0.0 {
        format!("+{:.1}", change)
    } else {
        format!("{:.1}", change)
    }
}

/// Build the forecast panel from a forecast set.
///
/// Sensors without a 24 hour prediction are skipped. A 24 hour alert is
/// reported as [`AlertSeverity::High`]; otherwise a 72 hour alert is reported
/// as [`AlertSeverity::Medium`].
pub fn build_report(forecasts: &ForecastSet) -> ForecastReport {
    let lines = forecasts
        .iter()
        .filter_map(|(sensor, forecast)| {
            let day = forecast.horizon(Horizon::Day)?;

            let alert = [
                (Horizon::Day, AlertSeverity::High),
                (Horizon::ThreeDays, AlertSeverity::Medium),
            ]
            .into_iter()
            .find_map(|(horizon, severity)| {
                let message = forecast.horizon(horizon)?.alert()?;
                Some(ForecastAlert {
                    severity,
                    message: message.to_string(),
                })
            });

            Some(ForecastLine {
                sensor: sensor.to_string(),
                current: day.current,
                predicted: day.predicted,
                change: day.change,
                trend: day.trend,
                alert,
            })
        })
        .collect();

    ForecastReport { lines }
}

/// Options for [`ForecastPoller`].
#[derive(Debug, Clone)]
pub struct ForecastPollerOptions {
    /// Time between cycles. Default: 5 minutes.
    pub interval: Duration,
}

impl Default for ForecastPollerOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_FORECAST_INTERVAL,
        }
    }
}

impl ForecastPollerOptions {
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::InvalidConfig("interval must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Periodically renders forecast alerts.
pub struct ForecastPoller {
    sync: Arc<ForecastSync>,
    interval: Duration,
    task: Option<PeriodicTask>,
}

impl ForecastPoller {
    /// Create a stopped poller. Fails if the options do not validate.
    pub fn new(
        source: Arc<dyn DashboardSource>,
        view: Arc<dyn DashboardView>,
        options: ForecastPollerOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            sync: Arc::new(ForecastSync {
                source,
                view,
                cycle: Mutex::new(()),
            }),
            interval: options.interval,
            task: None,
        })
    }

    /// Start polling. Returns `false` if already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        info!("Starting forecast poller (interval: {:?})", self.interval);
        let sync = Arc::clone(&self.sync);
        self.task = Some(PeriodicTask::spawn("forecast poller", self.interval, move || {
            let sync = Arc::clone(&sync);
            async move {
                let _ = sync.run_cycle().await;
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
                    info!("Stopped forecast poller");
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

    /// Fetch and render forecasts now.
    ///
    /// On error the view is left untouched and the error is returned.
    pub async fn refresh(&self) -> Result<ForecastReport> {
        self.sync.run_cycle().await
    }
}

impl std::fmt::Debug for ForecastPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastPoller")
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .finish()
    }
}

struct ForecastSync {
    source: Arc<dyn DashboardSource>,
    view: Arc<dyn DashboardView>,
    cycle: Mutex<()>,
}

impl ForecastSync {
    async fn run_cycle(&self) -> Result<ForecastReport> {
        let _guard = self.cycle.lock().await;

        match self.source.fetch_forecasts().await {
            Ok(forecasts) => {
                let report = build_report(&forecasts);
                debug!(
                    "Forecast updated: {} sensor(s), {} alert(s)",
                    report.lines.len(),
                    report.alerts().count()
                );
                self.view.set_forecast_alerts(&report);
                Ok(report)
            }
            Err(e) => {
                warn!("Failed to load forecasts: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hapag_types::{ForecastEntry, SensorForecast};

    use super::*;
    use crate::mock::MockSource;
    use crate::view::RecordingView;

    fn entry(current: f64, predicted: f64, alert: Option<&str>) -> ForecastEntry {
        ForecastEntry {
            current,
            predicted,
            change: predicted - current,
            trend: if predicted > current {
                Trend::Increasing
            } else {
                Trend::Decreasing
            },
            alert: alert.map(String::from),
        }
    }

    fn sensor(day: Option<ForecastEntry>, three_days: Option<ForecastEntry>) -> SensorForecast {
        SensorForecast { day, three_days }
    }

    #[test]
    fn test_no_alerts_is_all_clear() {
        let set: ForecastSet = [
            ("N", sensor(Some(entry(90.0, 95.0, None)), Some(entry(90.0, 100.0, None)))),
            ("P", sensor(Some(entry(30.0, 28.0, None)), None)),
        ]
        .into_iter()
        .collect();

        let report = build_report(&set);
        assert!(report.all_clear());
        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.alerts().count(), 0);
    }

    #[test]
    fn test_day_alert_wins_over_three_day_alert() {
        let set: ForecastSet = [(
            "N",
            sensor(
                Some(entry(45.0, 38.0, Some("N will reach critical LOW in 1 days"))),
                Some(entry(45.0, 30.0, Some("N will reach critical LOW in 3 days"))),
            ),
        )]
        .into_iter()
        .collect();

        let report = build_report(&set);
        let alert = report.lines[0].alert.as_ref().unwrap();
        assert_eq!(alert.severity, AlertSeverity::High);
        assert!(alert.message.contains("1 days"));
        assert!(!report.all_clear());
    }

    #[test]
    fn test_three_day_alert_is_medium() {
        let set: ForecastSet = [(
            "Humidity",
            sensor(
                Some(entry(75.0, 78.0, None)),
                Some(entry(75.0, 84.0, Some("Humidity will reach critical HIGH in 3 days"))),
            ),
        )]
        .into_iter()
        .collect();

        let report = build_report(&set);
        let alert = report.lines[0].alert.as_ref().unwrap();
        assert_eq!(alert.severity, AlertSeverity::Medium);
    }

    #[test]
    fn test_empty_day_alert_falls_back_to_three_day_alert() {
        let set: ForecastSet = [(
            "P",
            sensor(
                Some(entry(30.0, 28.0, Some(""))),
                Some(entry(30.0, 19.0, Some("P will reach critical LOW in 3 days"))),
            ),
        )]
        .into_iter()
        .collect();

        let report = build_report(&set);
        let alert = report.lines[0].alert.as_ref().unwrap();
        assert_eq!(alert.severity, AlertSeverity::Medium);
        assert!(alert.message.contains("3 days"));
    }

    #[test]
    fn test_missing_day_horizon_skipped_and_order_kept() {
        let set: ForecastSet = [
            ("K", sensor(Some(entry(120.0, 118.0, None)), None)),
            ("Temperature", sensor(None, Some(entry(25.0, 40.0, Some("hot"))))),
            ("N", sensor(Some(entry(90.0, 95.0, None)), None)),
        ]
        .into_iter()
        .collect();

        let report = build_report(&set);
        let sensors: Vec<&str> = report.lines.iter().map(|l| l.sensor.as_str()).collect();
        assert_eq!(sensors, vec!["K", "N"]);
        assert!(report.all_clear());
    }

    #[test]
    fn test_line_summary() {
        let line = ForecastLine {
            sensor: "N".to_string(),
            current: 90.0,
            predicted: 95.04,
            change: 5.04,
            trend: Trend::Increasing,
            alert: None,
        };
        assert_eq!(line.summary(), "N: 90.0 → 95.0 (+5.0) ↗");
    }

    #[test]
    fn test_format_change_negative_and_zero() {
        assert_eq!(format_change(-3.0), "-3.0");
        assert_eq!(format_change(0.0), "0.0");
        assert_eq!(format_change(0.04), "+0.0");
    }

    #[tokio::test]
    async fn test_refresh_renders_report() {
        let source = Arc::new(MockSource::new());
        source.set_forecasts(
            [("N", sensor(Some(entry(45.0, 38.0, Some("low"))), None))]
                .into_iter()
                .collect(),
        );
        let view = Arc::new(RecordingView::new());
        let poller = ForecastPoller::new(source.clone(), view.clone(), Default::default()).unwrap();

        let report = poller.refresh().await.unwrap();
        assert_eq!(view.forecast(), Some(report));
    }

    #[tokio::test]
    async fn test_failure_leaves_view_untouched() {
        let source = Arc::new(MockSource::new());
        source.set_forecasts(
            [("N", sensor(Some(entry(90.0, 95.0, None)), None))]
                .into_iter()
                .collect(),
        );
        let view = Arc::new(RecordingView::new());
        let poller = ForecastPoller::new(source.clone(), view.clone(), Default::default()).unwrap();

        let first = poller.refresh().await.unwrap();
        source.set_should_fail(true, "forecast model unavailable");
        assert!(poller.refresh().await.is_err());

        let state = view.snapshot();
        assert_eq!(state.forecast, Some(first));
        assert_eq!(state.forecast_updates, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_runs_every_five_minutes() {
        let source = Arc::new(MockSource::new());
        let view = Arc::new(RecordingView::new());
        let mut poller = ForecastPoller::new(source.clone(), view.clone(), Default::default()).unwrap();

        assert!(poller.start());
        assert!(!poller.start());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.forecast_fetches(), 1);
        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(source.forecast_fetches(), 2);

        assert!(poller.stop());
        tokio::time::sleep(Duration::from_secs(900)).await;
        assert_eq!(source.forecast_fetches(), 2);
        assert!(view.forecast().unwrap().all_clear());
    }

    #[tokio::test]
    async fn test_zero_interval_is_rejected_at_construction() {
        let source = Arc::new(MockSource::new());
        let view = Arc::new(RecordingView::new());

        let result = ForecastPoller::new(
            source.clone(),
            view,
            ForecastPollerOptions::with_interval(Duration::ZERO),
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
        assert_eq!(source.forecast_fetches(), 0);
    }
}
