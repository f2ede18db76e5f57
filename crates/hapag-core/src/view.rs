//! Presentation surface for the pollers.
//!
//! Pollers never render anything themselves; they push state into a
//! [`DashboardView`]. The CLI implements it for the terminal, tests use
//! [`RecordingView`].

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use hapag_types::Parameter;

use crate::forecast::ForecastReport;
use crate::thresholds::{Severity, classify_parameter, progress_percent};

/// State of the connection indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Offline,
}

impl ConnectionState {
    /// Label shown on the indicator.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connected => "Connected",
            ConnectionState::Offline => "Offline",
        }
    }
}

/// Everything needed to render one metric card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDisplay {
    pub parameter: Parameter,
    pub value: f64,
    pub unit: &'static str,
    /// Progress bar width, `0..=100`.
    pub percent: f64,
    pub status: Severity,
}

impl MetricDisplay {
    /// Derive the display values for a reading.
    pub fn new(parameter: Parameter, value: f64) -> Self {
        Self {
            parameter,
            value,
            unit: parameter.unit(),
            percent: progress_percent(parameter, value),
            status: classify_parameter(value, parameter),
        }
    }

    /// Value followed by its unit, e.g. `95 mg/kg`.
    pub fn value_text(&self) -> String {
        if self.unit.is_empty() {
            format!("{}", self.value)
        } else {
            format!("{} {}", self.value, self.unit)
        }
    }
}

/// Rendering surface driven by the pollers.
///
/// Calls are synchronous and happen after a cycle's fetch has completed, so
/// an implementation never observes a half-applied snapshot.
pub trait DashboardView: Send + Sync {
    /// Update the connection indicator.
    fn set_connection_state(&self, state: ConnectionState);

    /// Update one metric card.
    fn set_metric(&self, metric: &MetricDisplay);

    /// Update the "last reading" timestamp.
    fn set_timestamp(&self, timestamp: &str);

    /// Replace the forecast alert panel.
    fn set_forecast_alerts(&self, report: &ForecastReport);
}

/// Everything a [`RecordingView`] has been told.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Current connection indicator, `None` until first set.
    pub connection: Option<ConnectionState>,
    /// Every connection update, in order.
    pub connection_history: Vec<ConnectionState>,
    /// Latest display per parameter.
    pub metrics: BTreeMap<Parameter, MetricDisplay>,
    /// Total number of `set_metric` calls.
    pub metric_updates: usize,
    pub timestamp: Option<String>,
    pub forecast: Option<ForecastReport>,
    /// Total number of `set_forecast_alerts` calls.
    pub forecast_updates: usize,
}

/// In-memory view that records every update.
#[derive(Debug, Default)]
pub struct RecordingView {
    state: Mutex<ViewState>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded state.
    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    pub fn connection(&self) -> Option<ConnectionState> {
        self.lock().connection
    }

    pub fn metric(&self, parameter: Parameter) -> Option<MetricDisplay> {
        self.lock().metrics.get(&parameter).cloned()
    }

    pub fn metric_updates(&self) -> usize {
        self.lock().metric_updates
    }

    pub fn timestamp(&self) -> Option<String> {
        self.lock().timestamp.clone()
    }

    pub fn forecast(&self) -> Option<ForecastReport> {
        self.lock().forecast.clone()
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DashboardView for RecordingView {
    fn set_connection_state(&self, state: ConnectionState) {
        let mut s = self.lock();
        s.connection = Some(state);
        s.connection_history.push(state);
    }

    fn set_metric(&self, metric: &MetricDisplay) {
        let mut s = self.lock();
        s.metrics.insert(metric.parameter, metric.clone());
        s.metric_updates += 1;
    }

    fn set_timestamp(&self, timestamp: &str) {
        self.lock().timestamp = Some(timestamp.to_string());
    }

    fn set_forecast_alerts(&self, report: &ForecastReport) {
        let mut s = self.lock();
        s.forecast = Some(report.clone());
        s.forecast_updates += 1;
    }
}
