//! Core types for soil sensor readings.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// A parameter reported by the field sensor.
///
/// The wire keys are `N`, `P`, `K`, `ph` and `humidity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Parameter {
    /// Nitrogen in mg/kg.
    #[cfg_attr(feature = "serde", serde(rename = "N"))]
    Nitrogen,
    /// Phosphorus in mg/kg.
    #[cfg_attr(feature = "serde", serde(rename = "P"))]
    Phosphorus,
    /// Potassium in mg/kg.
    #[cfg_attr(feature = "serde", serde(rename = "K"))]
    Potassium,
    /// Soil acidity.
    #[cfg_attr(feature = "serde", serde(rename = "ph", alias = "pH"))]
    Ph,
    /// Relative humidity in percent.
    #[cfg_attr(feature = "serde", serde(rename = "humidity"))]
    Humidity,
}

impl Parameter {
    /// Every tracked parameter, in display order.
    pub const ALL: [Parameter; 5] = [
        Parameter::Nitrogen,
        Parameter::Phosphorus,
        Parameter::Potassium,
        Parameter::Ph,
        Parameter::Humidity,
    ];

    /// Key used on the wire and in the threshold table.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Parameter::Nitrogen => "N",
            Parameter::Phosphorus => "P",
            Parameter::Potassium => "K",
            Parameter::Ph => "ph",
            Parameter::Humidity => "humidity",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Parameter::Nitrogen => "Nitrogen",
            Parameter::Phosphorus => "Phosphorus",
            Parameter::Potassium => "Potassium",
            Parameter::Ph => "pH",
            Parameter::Humidity => "Humidity",
        }
    }

    /// Display unit. pH is unitless.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Nitrogen | Parameter::Phosphorus | Parameter::Potassium => "mg/kg",
            Parameter::Ph => "",
            Parameter::Humidity => "%",
        }
    }

    /// Value that fills a progress bar completely.
    #[must_use]
    pub fn display_max(&self) -> f64 {
        match self {
            Parameter::Nitrogen => 200.0,
            Parameter::Phosphorus => 60.0,
            Parameter::Potassium => 200.0,
            Parameter::Ph => 14.0,
            Parameter::Humidity => 100.0,
        }
    }

    /// Look up a parameter by its key.
    ///
    /// Matching is exact except that `pH` is accepted for `ph`.
    ///
    /// ```
    /// use hapag_types::Parameter;
    ///
    /// assert_eq!(Parameter::from_key("N"), Some(Parameter::Nitrogen));
    /// assert_eq!(Parameter::from_key("pH"), Some(Parameter::Ph));
    /// assert_eq!(Parameter::from_key("Z"), None);
    /// ```
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "N" => Some(Parameter::Nitrogen),
            "P" => Some(Parameter::Phosphorus),
            "K" => Some(Parameter::Potassium),
            "ph" | "pH" => Some(Parameter::Ph),
            "humidity" => Some(Parameter::Humidity),
            _ => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Parameter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::from_key(s).ok_or_else(|| ParseError::UnknownParameter(s.to_string()))
    }
}

/// The five tracked values of one sensor reading.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorReadings {
    #[cfg_attr(feature = "serde", serde(rename = "N"))]
    pub nitrogen: f64,
    #[cfg_attr(feature = "serde", serde(rename = "P"))]
    pub phosphorus: f64,
    #[cfg_attr(feature = "serde", serde(rename = "K"))]
    pub potassium: f64,
    #[cfg_attr(feature = "serde", serde(alias = "pH"))]
    pub ph: f64,
    pub humidity: f64,
}

impl SensorReadings {
    /// Value of a single parameter.
    #[must_use]
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Nitrogen => self.nitrogen,
            Parameter::Phosphorus => self.phosphorus,
            Parameter::Potassium => self.potassium,
            Parameter::Ph => self.ph,
            Parameter::Humidity => self.humidity,
        }
    }

    /// Iterate over `(parameter, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Parameter, f64)> + '_ {
        Parameter::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    /// Whether any tracked value differs from `other`.
    ///
    /// Values are compared exactly; a reading that repeats to the last digit
    /// is considered unchanged.
    #[must_use]
    pub fn differs_from(&self, other: &SensorReadings) -> bool {
        Parameter::ALL
            .into_iter()
            .any(|p| self.get(p) != other.get(p))
    }
}

/// Decide whether `current` should replace `previous`.
///
/// With no previous readings the answer is always `true`. Otherwise only the
/// five tracked values are compared; timestamps and connection flags are not
/// part of the comparison.
///
/// ```
/// use hapag_types::{SensorReadings, has_changed};
///
/// let r = SensorReadings { nitrogen: 90.0, phosphorus: 30.0, potassium: 120.0, ph: 6.5, humidity: 55.0 };
/// assert!(has_changed(None, &r));
/// assert!(!has_changed(Some(&r), &r));
/// ```
#[must_use]
pub fn has_changed(previous: Option<&SensorReadings>, current: &SensorReadings) -> bool {
    match previous {
        None => true,
        Some(prev) => current.differs_from(prev),
    }
}

/// A complete, accepted sensor reading.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorSnapshot {
    /// Whether the backend reported the sensor as connected.
    pub connected: bool,
    /// Backend-supplied timestamp, displayed verbatim.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp: Option<String>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub readings: SensorReadings,
}

impl SensorSnapshot {
    /// Create a connected snapshot.
    pub fn new(readings: SensorReadings, timestamp: impl Into<String>) -> Self {
        Self {
            connected: true,
            timestamp: Some(timestamp.into()),
            readings,
        }
    }
}

/// Body of the `/api/refresh` endpoint.
///
/// A disconnected backend answers with `{"connected": false}` only, so every
/// other field is optional here. [`RefreshResponse::into_snapshot`] enforces
/// the fields a connected reading must carry.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RefreshResponse {
    #[cfg_attr(feature = "serde", serde(default))]
    pub connected: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp: Option<String>,
    #[cfg_attr(feature = "serde", serde(rename = "N", default))]
    pub nitrogen: Option<f64>,
    #[cfg_attr(feature = "serde", serde(rename = "P", default))]
    pub phosphorus: Option<f64>,
    #[cfg_attr(feature = "serde", serde(rename = "K", default))]
    pub potassium: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, alias = "pH"))]
    pub ph: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub humidity: Option<f64>,
}

impl RefreshResponse {
    /// Response for a backend that has no live sensor.
    #[must_use]
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Response for a connected sensor with the given readings.
    pub fn connected(readings: SensorReadings, timestamp: impl Into<String>) -> Self {
        Self {
            connected: true,
            timestamp: Some(timestamp.into()),
            nitrogen: Some(readings.nitrogen),
            phosphorus: Some(readings.phosphorus),
            potassium: Some(readings.potassium),
            ph: Some(readings.ph),
            humidity: Some(readings.humidity),
        }
    }

    /// Convert into a snapshot.
    ///
    /// Returns `Ok(None)` when the backend reports the sensor disconnected and
    /// [`ParseError::MissingField`] when a connected response lacks a value.
    pub fn into_snapshot(self) -> ParseResult<Option<SensorSnapshot>> {
        if !self.connected {
            return Ok(None);
        }

        let readings = SensorReadings {
            nitrogen: self.nitrogen.ok_or(ParseError::MissingField("N"))?,
            phosphorus: self.phosphorus.ok_or(ParseError::MissingField("P"))?,
            potassium: self.potassium.ok_or(ParseError::MissingField("K"))?,
            ph: self.ph.ok_or(ParseError::MissingField("ph"))?,
            humidity: self.humidity.ok_or(ParseError::MissingField("humidity"))?,
        };

        Ok(Some(SensorSnapshot {
            connected: true,
            timestamp: self.timestamp,
            readings,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings() -> SensorReadings {
        SensorReadings {
            nitrogen: 90.0,
            phosphorus: 30.0,
            potassium: 120.0,
            ph: 6.5,
            humidity: 55.0,
        }
    }

    #[test]
    fn test_parameter_keys_roundtrip() {
        for p in Parameter::ALL {
            assert_eq!(Parameter::from_key(p.key()), Some(p));
            assert_eq!(p.key().parse::<Parameter>().unwrap(), p);
        }
    }

    #[test]
    fn test_parameter_unknown_key() {
        let err = "Z".parse::<Parameter>().unwrap_err();
        assert_eq!(err, ParseError::UnknownParameter("Z".to_string()));
        assert!(Parameter::from_key("nitrogen").is_none());
        assert!(Parameter::from_key("PH").is_none());
    }

    #[test]
    fn test_parameter_units() {
        assert_eq!(Parameter::Nitrogen.unit(), "mg/kg");
        assert_eq!(Parameter::Ph.unit(), "");
        assert_eq!(Parameter::Humidity.unit(), "%");
    }

    #[test]
    fn test_first_reading_is_always_a_change() {
        assert!(has_changed(None, &readings()));
    }

    #[test]
    fn test_identical_readings_unchanged() {
        let r = readings();
        assert!(!has_changed(Some(&r), &r));
    }

    #[test]
    fn test_single_field_change_detected() {
        let prev = readings();
        for p in Parameter::ALL {
            let mut next = prev;
            match p {
                Parameter::Nitrogen => next.nitrogen += 1.0,
                Parameter::Phosphorus => next.phosphorus += 1.0,
                Parameter::Potassium => next.potassium += 1.0,
                Parameter::Ph => next.ph += 0.1,
                Parameter::Humidity => next.humidity -= 1.0,
            }
            assert!(has_changed(Some(&prev), &next), "{p} change not detected");
        }
    }

    #[test]
    fn test_disconnected_response_has_no_snapshot() {
        assert_eq!(RefreshResponse::disconnected().into_snapshot(), Ok(None));
    }

    #[test]
    fn test_connected_response_requires_all_fields() {
        let mut response = RefreshResponse::connected(readings(), "2026-01-01 10:00");
        response.potassium = None;
        assert_eq!(
            response.into_snapshot(),
            Err(ParseError::MissingField("K"))
        );
    }

    #[test]
    fn test_connected_response_without_timestamp() {
        let mut response = RefreshResponse::connected(readings(), "ignored");
        response.timestamp = None;
        let snapshot = response.into_snapshot().unwrap().unwrap();
        assert!(snapshot.connected);
        assert_eq!(snapshot.timestamp, None);
        assert_eq!(snapshot.readings, readings());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_refresh_response_from_json() {
        let json = r#"{
            "connected": true,
            "timestamp": "2026-03-01 08:15:00",
            "N": 90, "P": 30.5, "K": 120, "ph": 6.5, "humidity": 55
        }"#;
        let response: RefreshResponse = serde_json::from_str(json).unwrap();
        let snapshot = response.into_snapshot().unwrap().unwrap();
        assert_eq!(snapshot.timestamp.as_deref(), Some("2026-03-01 08:15:00"));
        assert_eq!(snapshot.readings.phosphorus, 30.5);
        assert_eq!(snapshot.readings.get(Parameter::Humidity), 55.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_refresh_response_disconnected_json() {
        let response: RefreshResponse = serde_json::from_str(r#"{"connected": false}"#).unwrap();
        assert!(!response.connected);
        assert_eq!(response.into_snapshot(), Ok(None));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parameter_serde_accepts_ph_alias() {
        let p: Parameter = serde_json::from_str(r#""pH""#).unwrap();
        assert_eq!(p, Parameter::Ph);
        assert_eq!(serde_json::to_string(&Parameter::Ph).unwrap(), r#""ph""#);
    }
}
