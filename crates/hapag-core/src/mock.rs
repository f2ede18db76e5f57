//! Mock dashboard backend for testing.
//!
//! [`MockSource`] implements [`DashboardSource`] so pollers can be driven
//! without an HTTP server.
//!
//! # Features
//!
//! - **Scripted responses**: queue one-off responses ahead of a fallback
//! - **Failure injection**: make either endpoint return an API error
//! - **Latency simulation**: delay every fetch (honours paused tokio time)
//! - **Call accounting**: count fetches and the peak number in flight

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use hapag_types::{ForecastSet, RefreshResponse, SensorReadings};

use crate::error::{Error, Result};
use crate::traits::DashboardSource;

/// Timestamp reported by [`MockSource::with_readings`].
pub const MOCK_TIMESTAMP: &str = "2026-01-01 00:00:00";

/// A scripted dashboard backend.
///
/// # Example
///
/// ```
/// use hapag_core::{DashboardSource, MockSource};
/// use hapag_types::SensorReadings;
///
/// #[tokio::main]
/// async fn main() {
///     let source = MockSource::with_readings(SensorReadings {
///         nitrogen: 90.0,
///         phosphorus: 30.0,
///         potassium: 120.0,
///         ph: 6.5,
///         humidity: 55.0,
///     });
///
///     let response = source.fetch_snapshot().await.unwrap();
///     assert!(response.connected);
///     assert_eq!(source.snapshot_fetches(), 1);
/// }
/// ```
#[derive(Default)]
pub struct MockSource {
    state: Mutex<MockState>,
    should_fail: AtomicBool,
    forecast_should_fail: AtomicBool,
    /// Simulated latency in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
    snapshot_fetches: AtomicU32,
    forecast_fetches: AtomicU32,
    in_flight: AtomicU32,
    max_in_flight: AtomicU32,
}

#[derive(Default)]
struct MockState {
    queued: VecDeque<RefreshResponse>,
    response: RefreshResponse,
    forecasts: ForecastSet,
    fail_message: String,
}

impl std::fmt::Debug for MockSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSource")
            .field("should_fail", &self.should_fail.load(Ordering::Relaxed))
            .field("snapshot_fetches", &self.snapshot_fetches())
            .field("forecast_fetches", &self.forecast_fetches())
            .finish()
    }
}

impl MockSource {
    /// A backend that reports a disconnected sensor and no forecasts.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that always reports `readings` at [`MOCK_TIMESTAMP`].
    pub fn with_readings(readings: SensorReadings) -> Self {
        let source = Self::new();
        source.set_response(RefreshResponse::connected(readings, MOCK_TIMESTAMP));
        source
    }

    /// Queue a response returned once, ahead of the fallback response.
    pub fn push_response(&self, response: RefreshResponse) {
        self.lock().queued.push_back(response);
    }

    /// Set the response returned once the queue is empty.
    pub fn set_response(&self, response: RefreshResponse) {
        self.lock().response = response;
    }

    pub fn set_forecasts(&self, forecasts: ForecastSet) {
        self.lock().forecasts = forecasts;
    }

    /// Make both endpoints fail with a 503 carrying `message`.
    pub fn set_should_fail(&self, fail: bool, message: &str) {
        self.should_fail.store(fail, Ordering::Relaxed);
        self.lock().fail_message = message.to_string();
    }

    /// Make only the forecast endpoint fail.
    pub fn set_forecast_should_fail(&self, fail: bool) {
        self.forecast_should_fail.store(fail, Ordering::Relaxed);
    }

    /// Delay every fetch by `latency`. `Duration::ZERO` disables it.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of `fetch_snapshot` calls so far.
    pub fn snapshot_fetches(&self) -> u32 {
        self.snapshot_fetches.load(Ordering::Relaxed)
    }

    /// Number of `fetch_forecasts` calls so far.
    pub fn forecast_fetches(&self) -> u32 {
        self.forecast_fetches.load(Ordering::Relaxed)
    }

    /// Highest number of fetches that were in flight at once.
    pub fn max_concurrent_fetches(&self) -> u32 {
        self.max_in_flight.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn begin_fetch(&self) -> InFlight<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlight(&self.in_flight);

        let latency = self.latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        guard
    }

    fn failure(&self) -> Error {
        Error::Api {
            status: 503,
            message: self.lock().fail_message.clone(),
        }
    }
}

struct InFlight<'a>(&'a AtomicU32);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DashboardSource for MockSource {
    async fn fetch_snapshot(&self) -> Result<RefreshResponse> {
        self.snapshot_fetches.fetch_add(1, Ordering::Relaxed);
        let _in_flight = self.begin_fetch().await;

        if self.should_fail.load(Ordering::Relaxed) {
            return Err(self.failure());
        }

        let mut state = self.lock();
        Ok(match state.queued.pop_front() {
            Some(response) => response,
            None => state.response.clone(),
        })
    }

    async fn fetch_forecasts(&self) -> Result<ForecastSet> {
        self.forecast_fetches.fetch_add(1, Ordering::Relaxed);
        let _in_flight = self.begin_fetch().await;

        if self.should_fail.load(Ordering::Relaxed)
            || self.forecast_should_fail.load(Ordering::Relaxed)
        {
            return Err(self.failure());
        }

        Ok(self.lock().forecasts.clone())
    }
}
