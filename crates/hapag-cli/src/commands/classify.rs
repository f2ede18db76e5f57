//! Classify command implementation.

use anyhow::Result;
use owo_colors::OwoColorize;

use hapag_core::{Classification, classify};

use crate::view::format_severity;

pub fn cmd_classify(parameter: &str, value: f64, no_color: bool) -> Result<()> {
    println!("{}", format_classification(parameter, value, no_color));
    Ok(())
}

/// Text for one classification. Unknown parameter names are reported, not rejected.
fn format_classification(parameter: &str, value: f64, no_color: bool) -> String {
    match classify(value, parameter) {
        Classification::Known(status) => format!(
            "{} = {}  {}\n  {}",
            parameter,
            value,
            format_severity(status, no_color),
            status.description()
        ),
        Classification::Unknown => {
            let label = "[UNKNOWN]";
            let badge = if no_color {
                label.to_string()
            } else {
                label.dimmed().to_string()
            };
            format!(
                "{} = {}  {}\n  No thresholds for '{}'. Known parameters: N, P, K, ph, humidity",
                parameter, value, badge, parameter
            )
        }
    }
}
