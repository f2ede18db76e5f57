//! HTTP client for the farm dashboard backend.
//!
//! # Example
//!
//! ```no_run
//! use hapag_core::DashboardClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DashboardClient::new("http://localhost:5000")?;
//!
//! let response = client.refresh().await?;
//! println!("Sensor connected: {}", response.connected);
//!
//! for (sensor, forecast) in client.forecast().await?.iter() {
//!     println!("{sensor}: {:?}", forecast.day);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use hapag_types::{ForecastSet, RefreshResponse};

use crate::error::{Error, Result};
use crate::traits::DashboardSource;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the dashboard API.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    /// Create a new client with the default request timeout.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the dashboard backend (e.g., "http://localhost:5000")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Request)?;

        Self::with_client(base_url, client)
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the latest reading.
    pub async fn refresh(&self) -> Result<RefreshResponse> {
        let url = format!("{}/api/refresh", self.base_url);
        self.get(&url).await
    }

    /// Fetch forecasts for every sensor the backend tracks.
    pub async fn forecast(&self) -> Result<ForecastSet> {
        let url = format!("{}/api/forecast", self.base_url);
        self.get(&url).await
    }

    /// Check if the backend answers at all.
    pub async fn is_reachable(&self) -> bool {
        self.refresh().await.is_ok()
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::NotReachable {
                url: url.to_string(),
                source: e,
            })?;

        handle_response(response).await
    }
}

#[async_trait]
impl DashboardSource for DashboardClient {
    async fn fetch_snapshot(&self) -> Result<RefreshResponse> {
        self.refresh().await
    }

    async fn fetch_forecasts(&self) -> Result<ForecastSet> {
        self.forecast().await
    }
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim_end_matches('/').to_string();

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(Error::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }

    Ok(base_url)
}

async fn handle_response<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        response.json().await.map_err(Error::Request)
    } else {
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| status.to_string());

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = DashboardClient::new("http://localhost:5000");
        assert!(client.is_ok());

        let client = client.unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_client_normalizes_url() {
        let client = DashboardClient::new("http://farm.local:5000/").unwrap();
        assert_eq!(client.base_url(), "http://farm.local:5000");
    }

    #[test]
    fn test_client_invalid_url() {
        let result = DashboardClient::new("localhost:5000");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_client_https_accepted() {
        assert!(DashboardClient::new("https://farm.example.com").is_ok());
    }
}
