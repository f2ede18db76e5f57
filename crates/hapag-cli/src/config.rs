//! Client configuration.
//!
//! Loaded from `<config_dir>/hapag/client.toml`. Every section and key is
//! optional; anything missing falls back to the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use hapag_core::{ForecastPollerOptions, SensorPollerOptions};

/// Client configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend settings.
    pub server: ServerConfig,
    /// Sensor poller settings.
    pub sensor: SensorConfig,
    /// Forecast poller settings.
    pub forecast: ForecastConfig,
}

impl Config {
    /// Load configuration from the default path, or defaults if it does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration, collecting every problem found.
    ///
    /// # Example
    ///
    /// ```
    /// use hapag_cli::config::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());
        errors.extend(self.sensor.validate());
        errors.extend(self.forecast.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Sensor poller options derived from this configuration.
    pub fn sensor_options(&self) -> SensorPollerOptions {
        SensorPollerOptions::with_interval(Duration::from_secs(self.sensor.interval_secs))
            .stale_as_offline(self.sensor.stale_as_offline)
    }

    /// Forecast poller options derived from this configuration.
    pub fn forecast_options(&self) -> ForecastPollerOptions {
        ForecastPollerOptions::with_interval(Duration::from_secs(self.forecast.interval_secs))
    }
}

/// Backend settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the dashboard backend.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.url.is_empty() {
            errors.push(ValidationError {
                field: "server.url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            errors.push(ValidationError {
                field: "server.url".to_string(),
                message: format!("'{}' must start with http:// or https://", self.url),
            });
        }

        if !(1..=300).contains(&self.timeout_secs) {
            errors.push(ValidationError {
                field: "server.timeout_secs".to_string(),
                message: format!(
                    "timeout must be between 1 and 300 seconds, got {}",
                    self.timeout_secs
                ),
            });
        }

        errors
    }
}

/// Sensor poller settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Seconds between `/api/refresh` polls.
    pub interval_secs: u64,
    /// Treat an unchanged reading as an offline sensor.
    pub stale_as_offline: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            stale_as_offline: true,
        }
    }
}

impl SensorConfig {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !(1..=3600).contains(&self.interval_secs) {
            errors.push(ValidationError {
                field: "sensor.interval_secs".to_string(),
                message: format!(
                    "interval must be between 1 and 3600 seconds, got {}",
                    self.interval_secs
                ),
            });
        }
        errors
    }
}

/// Forecast poller settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Seconds between `/api/forecast` polls.
    pub interval_secs: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self { interval_secs: 300 }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !(10..=86400).contains(&self.interval_secs) {
            errors.push(ValidationError {
                field: "forecast.interval_secs".to_string(),
                message: format!(
                    "interval must be between 10 and 86400 seconds, got {}",
                    self.interval_secs
                ),
            });
        }
        errors
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `sensor.interval_secs`).
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hapag")
        .join("client.toml")
}
