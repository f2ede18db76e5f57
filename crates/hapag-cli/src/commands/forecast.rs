//! Forecast command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};

use hapag_core::{ForecastPoller, RecordingView};

use super::AppContext;
use crate::view::format_forecast;

pub async fn cmd_forecast(ctx: &AppContext, json: bool) -> Result<()> {
    let client = ctx.client()?;
    let view = Arc::new(RecordingView::new());
    let poller = ForecastPoller::new(client, view, ctx.config.forecast_options())?;

    let report = poller
        .refresh()
        .await
        .context("Failed to load forecasts")?;

    let content = if json {
        serde_json::to_string_pretty(&report).context("Failed to serialize forecast")?
    } else {
        format_forecast(&report, ctx.no_color)
    };
    println!("{}", content);
    Ok(())
}
