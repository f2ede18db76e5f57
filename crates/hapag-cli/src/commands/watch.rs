//! Watch command implementation.
//!
//! Runs the sensor and forecast pollers into the terminal until Ctrl+C.
//! Pressing Enter triggers an immediate sensor refresh. With auto-refresh
//! switched off the sensor poller is never started and Enter is the only way
//! to fetch a new reading after the first one.

use std::sync::Arc;

use anyhow::Result;
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use hapag_core::{DashboardView, ForecastPoller, Preferences, SensorPoller};

use super::AppContext;
use crate::view::TerminalView;

/// Whether the sensor poller starts on its own. `--auto-refresh` overrides
/// the stored preference.
fn starts_sensor_poller(force: bool, prefs: &Preferences) -> bool {
    force || prefs.auto_refresh()
}

pub async fn cmd_watch(ctx: &AppContext, force_auto_refresh: bool) -> Result<()> {
    // Read once; later changes to the store take effect on the next run.
    let auto_refresh = starts_sensor_poller(force_auto_refresh, &ctx.preferences()?);
    let client = ctx.client()?;
    let view: Arc<dyn DashboardView> = Arc::new(TerminalView::new(ctx.no_color));

    let sensor_options = ctx.config.sensor_options();
    let sensor_interval = sensor_options.interval;
    let mut sensor = SensorPoller::new(client.clone(), Arc::clone(&view), sensor_options)?;
    let mut forecast = ForecastPoller::new(client, view, ctx.config.forecast_options())?;

    if !ctx.quiet {
        let url = &ctx.config.server.url;
        let header = if ctx.no_color {
            format!("Watching: {}", url)
        } else {
            format!("Watching: {}", url.cyan())
        };
        eprintln!("{}", header);
        if auto_refresh {
            eprintln!(
                "Interval: {}s | Enter to refresh | Ctrl+C to stop",
                sensor_interval.as_secs()
            );
        } else {
            eprintln!("Auto-refresh is off | Enter to refresh | Ctrl+C to stop");
        }
        eprintln!("{}", "-".repeat(50));
    }

    forecast.start();
    if auto_refresh {
        sensor.start();
    } else {
        let outcome = sensor.refresh().await;
        debug!("Initial refresh: {:?}", outcome);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("\nShutting down...");
                break;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(_)) => {
                    let outcome = sensor.refresh().await;
                    debug!("Manual refresh: {:?}", outcome);
                }
                Ok(None) => stdin_open = false,
                Err(e) => {
                    debug!("Stopped reading stdin: {}", e);
                    stdin_open = false;
                }
            },
        }
    }

    sensor.stop();
    forecast.stop();
    Ok(())
}
