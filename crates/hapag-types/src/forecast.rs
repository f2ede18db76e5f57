//! Forecast types returned by the `/api/forecast` endpoint.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of a predicted change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Trend {
    Increasing,
    Decreasing,
}

impl Trend {
    /// Arrow glyph used when rendering a forecast line.
    #[must_use]
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Increasing => "↗",
            Trend::Decreasing => "↘",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Increasing => f.write_str("increasing"),
            Trend::Decreasing => f.write_str("decreasing"),
        }
    }
}

/// A forecast time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizon {
    /// 24 hours ahead.
    Day,
    /// 72 hours ahead.
    ThreeDays,
}

/// Prediction for one sensor over one horizon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForecastEntry {
    /// Most recent observed value.
    pub current: f64,
    /// Predicted value at the end of the horizon.
    pub predicted: f64,
    /// `predicted - current`.
    pub change: f64,
    pub trend: Trend,
    /// Warning text when the prediction crosses a risk threshold.
    #[cfg_attr(feature = "serde", serde(default))]
    pub alert: Option<String>,
}

impl ForecastEntry {
    /// The alert text, treating an empty string as no alert.
    #[must_use]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref().filter(|a| !a.is_empty())
    }
}

/// Both horizons for one sensor. Either may be `null` on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorForecast {
    #[cfg_attr(feature = "serde", serde(rename = "24h", default))]
    pub day: Option<ForecastEntry>,
    #[cfg_attr(feature = "serde", serde(rename = "72h", default))]
    pub three_days: Option<ForecastEntry>,
}

impl SensorForecast {
    /// Entry for the given horizon.
    #[must_use]
    pub fn horizon(&self, horizon: Horizon) -> Option<&ForecastEntry> {
        match horizon {
            Horizon::Day => self.day.as_ref(),
            Horizon::ThreeDays => self.three_days.as_ref(),
        }
    }
}

/// Forecasts keyed by sensor name, in the order the backend sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSet(Vec<(String, SensorForecast)>);

impl ForecastSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sensor. Later entries render after earlier ones.
    pub fn push(&mut self, sensor: impl Into<String>, forecast: SensorForecast) {
        self.0.push((sensor.into(), forecast));
    }

    /// Forecast for a sensor by name.
    #[must_use]
    pub fn get(&self, sensor: &str) -> Option<&SensorForecast> {
        self.0.iter().find(|(name, _)| name == sensor).map(|(_, f)| f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SensorForecast)> {
        self.0.iter().map(|(name, f)| (name.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, SensorForecast)> for ForecastSet {
    fn from_iter<I: IntoIterator<Item = (S, SensorForecast)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(s, f)| (s.into(), f)).collect())
    }
}

#[cfg(feature = "serde")]
impl Serialize for ForecastSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, forecast) in &self.0 {
            map.serialize_entry(name, forecast)?;
        }
        map.end()
    }
}

// Deserialized through a visitor so document order survives.
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for ForecastSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ForecastSetVisitor;

        impl<'de> serde::de::Visitor<'de> for ForecastSetVisitor {
            type Value = ForecastSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of sensor names to forecasts")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, forecast)) = map.next_entry::<String, SensorForecast>()? {
                    entries.push((name, forecast));
                }
                Ok(ForecastSet(entries))
            }
        }

        deserializer.deserialize_map(ForecastSetVisitor)
    }
}
