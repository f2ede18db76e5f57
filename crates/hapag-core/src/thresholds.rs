//! Soil parameter thresholds and status classification.
//!
//! Each tracked parameter has a fixed table of four bounds. A value outside
//! the critical bounds is [`Severity::Critical`], a value outside the optimal
//! band is [`Severity::Warning`], anything else is [`Severity::Optimal`].
//!
//! # Example
//!
//! ```
//! use hapag_core::thresholds::{Classification, Severity, classify};
//!
//! assert_eq!(classify(100.0, "N"), Classification::Known(Severity::Optimal));
//! assert_eq!(classify(250.0, "N"), Classification::Known(Severity::Critical));
//! assert_eq!(classify(5.0, "Z"), Classification::Unknown);
//! ```

use core::fmt;

use serde::{Deserialize, Serialize};

use hapag_types::Parameter;

/// Status of a value relative to its parameter's thresholds.
///
/// Ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Inside the optimal band.
    Optimal,
    /// Outside the optimal band but inside the critical bounds.
    Warning,
    /// Beyond a critical bound.
    Critical,
}

impl Severity {
    /// Get a human-readable description of the severity.
    pub fn description(&self) -> &'static str {
        match self {
            Severity::Optimal => "Optimal - within target range",
            Severity::Warning => "Warning - outside optimal range",
            Severity::Critical => "Critical - immediate attention required",
        }
    }

    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Optimal => "optimal",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a value by parameter name.
///
/// Names without a threshold table yield [`Classification::Unknown`]; callers
/// have to handle it rather than assume a severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Known(Severity),
    Unknown,
}

impl Classification {
    /// The severity, if the parameter was known.
    #[must_use]
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Classification::Known(s) => Some(*s),
            Classification::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Classification::Unknown)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Known(s) => s.fmt(f),
            Classification::Unknown => f.write_str("unknown"),
        }
    }
}

/// Threshold table for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterThreshold {
    /// Below this is critical.
    pub critical_low: f64,
    /// Lower edge of the optimal band.
    pub optimal_min: f64,
    /// Upper edge of the optimal band.
    pub optimal_max: f64,
    /// Above this is critical.
    pub critical_high: f64,
}

const NITROGEN: ParameterThreshold = ParameterThreshold::new(20.0, 80.0, 120.0, 200.0);
const PHOSPHORUS: ParameterThreshold = ParameterThreshold::new(10.0, 20.0, 40.0, 60.0);
const POTASSIUM: ParameterThreshold = ParameterThreshold::new(40.0, 100.0, 150.0, 200.0);
const PH: ParameterThreshold = ParameterThreshold::new(5.0, 6.0, 7.0, 8.5);
const HUMIDITY: ParameterThreshold = ParameterThreshold::new(30.0, 50.0, 70.0, 90.0);

impl ParameterThreshold {
    pub const fn new(
        critical_low: f64,
        optimal_min: f64,
        optimal_max: f64,
        critical_high: f64,
    ) -> Self {
        Self {
            critical_low,
            optimal_min,
            optimal_max,
            critical_high,
        }
    }

    /// Compiled-in table for a parameter.
    #[must_use]
    pub const fn for_parameter(parameter: Parameter) -> Self {
        match parameter {
            Parameter::Nitrogen => NITROGEN,
            Parameter::Phosphorus => PHOSPHORUS,
            Parameter::Potassium => POTASSIUM,
            Parameter::Ph => PH,
            Parameter::Humidity => HUMIDITY,
        }
    }

    /// Table for a parameter name, or `None` for unknown names.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Parameter::from_key(name).map(Self::for_parameter)
    }

    /// Classify a value against this table.
    ///
    /// Bounds are inclusive on the good side: a value equal to
    /// `critical_low` is a warning, a value equal to `optimal_max` is optimal.
    #[must_use]
    pub fn classify(&self, value: f64) -> Severity {
        if value < self.critical_low || value > self.critical_high {
            Severity::Critical
        } else if value < self.optimal_min || value > self.optimal_max {
            Severity::Warning
        } else {
            Severity::Optimal
        }
    }
}

/// Classify a value for a typed parameter.
#[must_use]
pub fn classify_parameter(value: f64, parameter: Parameter) -> Severity {
    ParameterThreshold::for_parameter(parameter).classify(value)
}

/// Classify a value by parameter name.
#[must_use]
pub fn classify(value: f64, name: &str) -> Classification {
    match ParameterThreshold::lookup(name) {
        Some(threshold) => Classification::Known(threshold.classify(value)),
        None => Classification::Unknown,
    }
}

/// Width of a parameter's progress bar in percent.
///
/// `value * 100 / max`, clamped to `0..=100`.
///
/// ```
/// use hapag_core::thresholds::progress_percent;
/// use hapag_types::Parameter;
///
/// assert_eq!(progress_percent(Parameter::Nitrogen, 100.0), 50.0);
/// assert_eq!(progress_percent(Parameter::Nitrogen, 250.0), 100.0);
/// ```
#[must_use]
pub fn progress_percent(parameter: Parameter, value: f64) -> f64 {
    (value * 100.0 / parameter.display_max()).clamp(0.0, 100.0)
}
