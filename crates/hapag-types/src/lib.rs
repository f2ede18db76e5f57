//! Platform-agnostic types for Hapag farm soil sensors.
//!
//! This crate provides the data model shared by the dashboard client
//! (hapag-core) and the command-line front end (hapag-cli).
//!
//! # Features
//!
//! - Tracked parameters (N, P, K, pH, humidity) with units and display ranges
//! - Sensor readings, snapshots and the `/api/refresh` wire shape
//! - Change detection between polling cycles
//! - Forecast types for the `/api/forecast` endpoint
//!
//! # Example
//!
//! ```
//! use hapag_types::{Parameter, RefreshResponse, SensorReadings, has_changed};
//!
//! let readings = SensorReadings {
//!     nitrogen: 90.0,
//!     phosphorus: 30.0,
//!     potassium: 120.0,
//!     ph: 6.5,
//!     humidity: 55.0,
//! };
//! let snapshot = RefreshResponse::connected(readings, "2026-03-01 08:15")
//!     .into_snapshot()
//!     .unwrap()
//!     .unwrap();
//!
//! assert!(has_changed(None, &snapshot.readings));
//! assert_eq!(snapshot.readings.get(Parameter::Ph), 6.5);
//! ```

pub mod error;
pub mod forecast;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use forecast::{ForecastEntry, ForecastSet, Horizon, SensorForecast, Trend};
pub use types::{Parameter, RefreshResponse, SensorReadings, SensorSnapshot, has_changed};
