//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "hapag")]
#[command(author, version, about = "Terminal dashboard for Hapag farm soil sensors", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the client config file
    #[arg(short, long, global = true, env = "HAPAG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(short, long, global = true, env = "HAPAG_URL")]
    pub url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to the preference store
    #[arg(long, global = true, env = "HAPAG_PREFS")]
    pub prefs: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Continuously poll sensors and forecasts until Ctrl+C
    Watch {
        /// Start polling even if auto-refresh is switched off
        #[arg(long)]
        auto_refresh: bool,
    },

    /// Fetch the current sensor reading once
    Status {
        /// Print the reading as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch forecast alerts once
    Forecast {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a value against the agronomic thresholds
    Classify {
        /// Parameter name: N, P, K, ph or humidity
        parameter: String,

        /// Measured value
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Manage persisted preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum PrefsAction {
    /// Show all stored preferences
    Show,

    /// Switch automatic polling on or off for `hapag watch`
    AutoRefresh {
        #[arg(value_enum)]
        state: Toggle,
    },
}

/// On/off switch value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}
