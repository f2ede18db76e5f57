//! Polling and alerting core for the Hapag farm dashboard.
//!
//! This crate keeps a dashboard in sync with the farm backend's HTTP API.
//! It fetches soil readings and forecasts, decides when the sensor should be
//! considered offline, and classifies each reading against fixed agronomic
//! thresholds. Rendering is left to a [`DashboardView`] implementation.
//!
//! # Features
//!
//! - **Sensor polling**: fetch `/api/refresh` every 10 seconds and re-render
//!   only when a reading actually changed
//! - **Stale detection**: an unchanged reading marks the sensor offline
//! - **Forecast alerts**: fetch `/api/forecast` every 5 minutes and pick the
//!   most urgent alert per sensor
//! - **Threshold classification**: optimal, warning or critical per parameter
//! - **Preferences**: persisted auto-refresh switch
//!
//! # Parameters
//!
//! | Parameter | Unit | Optimal range |
//! |-----------|------|---------------|
//! | Nitrogen (N) | mg/kg | 80 - 120 |
//! | Phosphorus (P) | mg/kg | 20 - 40 |
//! | Potassium (K) | mg/kg | 100 - 150 |
//! | pH | | 6.0 - 7.0 |
//! | Humidity | % | 50 - 70 |
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hapag_core::{DashboardClient, RecordingView, SensorPoller, SensorPollerOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(DashboardClient::new("http://localhost:5000")?);
//!     let view = Arc::new(RecordingView::new());
//!
//!     let mut poller = SensorPoller::new(client, view.clone(), SensorPollerOptions::default())?;
//!     poller.start();
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(30)).await;
//!     println!("Connection: {:?}", view.connection());
//!     poller.stop();
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod forecast;
pub mod mock;
pub mod poller;
pub mod preferences;
mod schedule;
pub mod thresholds;
pub mod traits;
pub mod view;

// Core exports
pub use client::DashboardClient;
pub use error::{Error, Result};
pub use traits::DashboardSource;
pub use view::{ConnectionState, DashboardView, MetricDisplay, RecordingView, ViewState};

pub use forecast::{
    ALL_CLEAR_MESSAGE, AlertSeverity, DEFAULT_FORECAST_INTERVAL, FORECAST_TITLE, ForecastAlert,
    ForecastLine, ForecastPoller, ForecastPollerOptions, ForecastReport, build_report,
};
pub use mock::MockSource;
pub use poller::{
    DEFAULT_SENSOR_INTERVAL, OfflineReason, PollOutcome, SensorPoller, SensorPollerOptions,
};
pub use preferences::{AUTO_REFRESH_KEY, Preferences, default_preferences_path};
pub use thresholds::{
    Classification, ParameterThreshold, Severity, classify, classify_parameter, progress_percent,
};

// Re-export from hapag-types
pub use hapag_types::{
    ForecastEntry, ForecastSet, Horizon, Parameter, RefreshResponse, SensorForecast,
    SensorReadings, SensorSnapshot, Trend,
};
