//! Terminal rendering of the dashboard.

use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

use hapag_core::{
    ALL_CLEAR_MESSAGE, AlertSeverity, ConnectionState, DashboardView, FORECAST_TITLE,
    ForecastReport, MetricDisplay, Severity,
};

/// Width of a metric's progress bar in characters.
const BAR_WIDTH: usize = 20;

/// Format a severity badge with color.
#[must_use]
pub fn format_severity(status: Severity, no_color: bool) -> String {
    let label = status.as_str().to_uppercase();

    if no_color {
        format!("[{}]", label)
    } else {
        match status {
            Severity::Optimal => format!("[{}]", label.green()),
            Severity::Warning => format!("[{}]", label.yellow()),
            Severity::Critical => format!("[{}]", label.red()),
        }
    }
}

/// Render `percent` (0-100) as a fixed-width bar.
#[must_use]
pub fn format_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// One metric card as a single line.
#[must_use]
pub fn format_metric_line(metric: &MetricDisplay, no_color: bool) -> String {
    format!(
        "  {:<10} {:>12}  {} {:>3.0}%  {}",
        metric.parameter.label(),
        metric.value_text(),
        format_bar(metric.percent),
        metric.percent,
        format_severity(metric.status, no_color)
    )
}

#[must_use]
pub fn format_connection(state: ConnectionState, no_color: bool) -> String {
    let label = state.label();
    if no_color {
        format!("Sensor: {}", label)
    } else {
        match state {
            ConnectionState::Connected => format!("Sensor: {}", label.green().bold()),
            ConnectionState::Offline => format!("Sensor: {}", label.red().bold()),
        }
    }
}

/// The forecast panel: title, one line per sensor, then alerts or the all-clear message.
#[must_use]
pub fn format_forecast(report: &ForecastReport, no_color: bool) -> String {
    let mut out = if no_color {
        FORECAST_TITLE.to_string()
    } else {
        FORECAST_TITLE.bold().to_string()
    };

    for line in &report.lines {
        out.push_str("\n  ");
        out.push_str(&line.summary());
    }

    if report.all_clear() {
        out.push('\n');
        if no_color {
            out.push_str(ALL_CLEAR_MESSAGE);
        } else {
            out.push_str(&ALL_CLEAR_MESSAGE.green().to_string());
        }
        return out;
    }

    for (_, alert) in report.alerts() {
        out.push('\n');
        let text = match (alert.severity, no_color) {
            (_, true) => format!("! {}", alert.message),
            (AlertSeverity::High, false) => format!("{} {}", "!".red().bold(), alert.message.red()),
            (AlertSeverity::Medium, false) => {
                format!("{} {}", "!".yellow().bold(), alert.message.yellow())
            }
        };
        out.push_str(&text);
    }
    out
}

/// [`DashboardView`] that prints to stdout.
///
/// The connection indicator is only printed when it changes, so a sensor
/// that stays offline does not flood the terminal.
#[derive(Debug)]
pub struct TerminalView {
    no_color: bool,
    connection: Mutex<Option<ConnectionState>>,
}

impl TerminalView {
    pub fn new(no_color: bool) -> Self {
        Self {
            no_color,
            connection: Mutex::new(None),
        }
    }

    /// Record `state` and report whether it differs from the previous one.
    fn connection_changed(&self, state: ConnectionState) -> bool {
        let mut current = self
            .connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        current.replace(state) != Some(state)
    }
}

impl DashboardView for TerminalView {
    fn set_connection_state(&self, state: ConnectionState) {
        if self.connection_changed(state) {
            println!("{}", format_connection(state, self.no_color));
        }
    }

    fn set_metric(&self, metric: &MetricDisplay) {
        println!("{}", format_metric_line(metric, self.no_color));
    }

    fn set_timestamp(&self, timestamp: &str) {
        if self.no_color {
            println!("  Last reading: {}", timestamp);
        } else {
            println!("  Last reading: {}", timestamp.dimmed());
        }
    }

    fn set_forecast_alerts(&self, report: &ForecastReport) {
        println!("{}", format_forecast(report, self.no_color));
    }
}

#[cfg(test)]
mod tests {
    use hapag_core::{ForecastAlert, ForecastLine, Parameter, Trend};

    use super::*;

    #[test]
    fn test_format_severity_plain() {
        assert_eq!(format_severity(Severity::Optimal, true), "[OPTIMAL]");
        assert_eq!(format_severity(Severity::Critical, true), "[CRITICAL]");
    }

    #[test]
    fn test_format_severity_colored_keeps_label() {
        let s = format_severity(Severity::Warning, false);
        assert!(s.contains("WARNING"));
        assert!(s.contains("\x1b["));
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(0.0), format!("[{}]", "-".repeat(20)));
        assert_eq!(format_bar(100.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(format_bar(50.0), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
    }

    #[test]
    fn test_format_metric_line() {
        let line = format_metric_line(&MetricDisplay::new(Parameter::Nitrogen, 100.0), true);
        assert!(line.contains("Nitrogen"));
        assert!(line.contains("100 mg/kg"));
        assert!(line.contains(" 50%"));
        assert!(line.ends_with("[OPTIMAL]"));
    }

    #[test]
    fn test_format_connection() {
        assert_eq!(format_connection(ConnectionState::Offline, true), "Sensor: Offline");
        assert_eq!(
            format_connection(ConnectionState::Connected, true),
            "Sensor: Connected"
        );
    }

    #[test]
    fn test_forecast_all_clear() {
        let report = ForecastReport {
            lines: vec![ForecastLine {
                sensor: "N".to_string(),
                current: 90.0,
                predicted: 95.0,
                change: 5.0,
                trend: Trend::Increasing,
                alert: None,
            }],
        };
        let text = format_forecast(&report, true);
        assert_eq!(
            text,
            format!(
                "{}\n  N: 90.0 → 95.0 (+5.0) ↗\n{}",
                FORECAST_TITLE, ALL_CLEAR_MESSAGE
            )
        );
    }

    #[test]
    fn test_forecast_alerts_replace_all_clear() {
        let report = ForecastReport {
            lines: vec![ForecastLine {
                sensor: "K".to_string(),
                current: 45.0,
                predicted: 38.0,
                change: -7.0,
                trend: Trend::Decreasing,
                alert: Some(ForecastAlert {
                    severity: AlertSeverity::High,
                    message: "K will reach critical LOW in 1 days".to_string(),
                }),
            }],
        };
        let text = format_forecast(&report, true);
        assert!(text.contains("K: 45.0 → 38.0 (-7.0) ↘"));
        assert!(text.ends_with("! K will reach critical LOW in 1 days"));
        assert!(!text.contains(ALL_CLEAR_MESSAGE));
    }

    #[test]
    fn test_empty_forecast_is_all_clear() {
        let text = format_forecast(&ForecastReport::default(), true);
        assert_eq!(text, format!("{}\n{}", FORECAST_TITLE, ALL_CLEAR_MESSAGE));
    }

    #[test]
    fn test_connection_printed_only_on_change() {
        let view = TerminalView::new(true);
        assert!(view.connection_changed(ConnectionState::Offline));
        assert!(!view.connection_changed(ConnectionState::Offline));
        assert!(view.connection_changed(ConnectionState::Connected));
    }
}
