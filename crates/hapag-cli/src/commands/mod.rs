//! Command implementations for the CLI.

mod classify;
mod forecast;
mod prefs;
mod status;
mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use hapag_core::{DashboardClient, Preferences};

use crate::config::Config;

pub use classify::cmd_classify;
pub use forecast::cmd_forecast;
pub use prefs::cmd_prefs;
pub use status::cmd_status;
pub use watch::cmd_watch;

/// Settings resolved from the config file and global flags.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    pub no_color: bool,
    pub quiet: bool,
    /// Preference store override; `None` uses the default location.
    pub prefs_path: Option<PathBuf>,
}

impl AppContext {
    /// HTTP client for the configured backend.
    pub fn client(&self) -> Result<Arc<DashboardClient>> {
        let client =
            DashboardClient::with_timeout(&self.config.server.url, self.config.server.timeout())
                .with_context(|| {
                    format!("Failed to create client for {}", self.config.server.url)
                })?;
        Ok(Arc::new(client))
    }

    pub fn preferences(&self) -> Result<Preferences> {
        let prefs = match &self.prefs_path {
            Some(path) => Preferences::open(path),
            None => Preferences::load(),
        };
        prefs.context("Failed to load preferences")
    }
}
