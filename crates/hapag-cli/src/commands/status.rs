//! Status command implementation.
//!
//! Runs a single sensor cycle against a [`RecordingView`] and prints what the
//! dashboard would show.

use std::sync::Arc;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use hapag_core::{
    ConnectionState, MetricDisplay, OfflineReason, Parameter, PollOutcome, RecordingView,
    SensorPoller, ViewState,
};

use super::AppContext;
use crate::view::{format_connection, format_metric_line};

#[derive(Debug, Serialize)]
struct StatusJson<'a> {
    connection: ConnectionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    offline_reason: Option<OfflineReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<&'a str>,
    metrics: Vec<&'a MetricDisplay>,
}

pub async fn cmd_status(ctx: &AppContext, json: bool) -> Result<()> {
    let client = ctx.client()?;
    let view = Arc::new(RecordingView::new());
    let poller = SensorPoller::new(client, view.clone(), ctx.config.sensor_options())?;

    let outcome = poller.refresh().await;
    let state = view.snapshot();

    let content = if json {
        format_status_json(outcome, &state)?
    } else {
        format_status_text(outcome, &state, ctx.no_color)
    };
    println!("{}", content);
    Ok(())
}

fn offline_reason(outcome: PollOutcome) -> Option<OfflineReason> {
    match outcome {
        PollOutcome::Offline(reason) => Some(reason),
        _ => None,
    }
}

fn format_status_json(outcome: PollOutcome, state: &ViewState) -> Result<String> {
    let status = StatusJson {
        connection: outcome.connection_state(),
        offline_reason: offline_reason(outcome),
        timestamp: state.timestamp.as_deref(),
        metrics: Parameter::ALL
            .iter()
            .filter_map(|p| state.metrics.get(p))
            .collect(),
    };
    serde_json::to_string_pretty(&status).context("Failed to serialize status")
}

fn format_status_text(outcome: PollOutcome, state: &ViewState, no_color: bool) -> String {
    let mut out = format_connection(outcome.connection_state(), no_color);
    if let Some(reason) = offline_reason(outcome) {
        let note = format!(" ({})", reason.description());
        if no_color {
            out.push_str(&note);
        } else {
            out.push_str(&note.dimmed().to_string());
        }
    }

    for parameter in Parameter::ALL {
        if let Some(metric) = state.metrics.get(&parameter) {
            out.push('\n');
            out.push_str(&format_metric_line(metric, no_color));
        }
    }

    if let Some(timestamp) = &state.timestamp {
        out.push_str(&format!("\n  Last reading: {}", timestamp));
    }
    out
}

#[cfg(test)]
mod tests {
    use hapag_core::{DashboardView, Parameter};

    use super::*;

    fn recorded() -> ViewState {
        let view = RecordingView::new();
        for (parameter, value) in [
            (Parameter::Nitrogen, 95.0),
            (Parameter::Phosphorus, 30.0),
            (Parameter::Potassium, 120.0),
            (Parameter::Ph, 6.5),
            (Parameter::Humidity, 55.0),
        ] {
            view.set_metric(&MetricDisplay::new(parameter, value));
        }
        view.set_timestamp("2026-03-01 08:15:00");
        view.snapshot()
    }

    #[test]
    fn test_text_lists_metrics_in_display_order() {
        let text = format_status_text(PollOutcome::Updated, &recorded(), true);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Sensor: Connected");
        assert!(lines[1].contains("Nitrogen"));
        assert!(lines[4].contains("pH"));
        assert!(lines[5].contains("Humidity"));
        assert_eq!(lines[6], "  Last reading: 2026-03-01 08:15:00");
    }

    #[test]
    fn test_offline_text_names_reason() {
        let text = format_status_text(
            PollOutcome::Offline(OfflineReason::Transport),
            &ViewState::default(),
            true,
        );
        assert_eq!(text, "Sensor: Offline (backend unreachable)");
    }

    #[test]
    fn test_json_output() {
        let json = format_status_json(PollOutcome::Updated, &recorded()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["connection"], "connected");
        assert!(value.get("offline_reason").is_none());
        assert_eq!(value["metrics"][0]["parameter"], "N");
        assert_eq!(value["metrics"][0]["status"], "optimal");
        assert_eq!(value["metrics"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_json_offline_reason() {
        let json = format_status_json(
            PollOutcome::Offline(OfflineReason::SensorDisconnected),
            &ViewState::default(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["connection"], "offline");
        assert_eq!(value["offline_reason"], "sensor_disconnected");
    }
}
