//! Trait abstractions for the dashboard backend.
//!
//! This module provides the [`DashboardSource`] trait that abstracts over the
//! real HTTP backend and scripted sources for testing.

use async_trait::async_trait;

use hapag_types::{ForecastSet, RefreshResponse};

use crate::error::Result;

/// Source of sensor snapshots and forecasts.
///
/// Implemented by [`crate::DashboardClient`] for the HTTP backend and by
/// [`crate::MockSource`] for tests.
///
/// # Example
///
/// ```ignore
/// use hapag_core::{DashboardSource, Result};
///
/// async fn print_nitrogen<S: DashboardSource>(source: &S) -> Result<()> {
///     let response = source.fetch_snapshot().await?;
///     println!("N: {:?}", response.nitrogen);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Fetch the latest sensor snapshot (`GET /api/refresh`).
    async fn fetch_snapshot(&self) -> Result<RefreshResponse>;

    /// Fetch per-sensor forecasts (`GET /api/forecast`).
    async fn fetch_forecasts(&self) -> Result<ForecastSet>;
}
