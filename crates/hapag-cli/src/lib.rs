//! Terminal dashboard for Hapag farm soil sensors.
//!
//! Polls the farm backend and renders soil readings, threshold status and
//! forecast alerts in the terminal.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `watch` | Continuously poll sensors and forecasts |
//! | `status` | Fetch the current reading once |
//! | `forecast` | Fetch forecast alerts once |
//! | `classify` | Classify a value against the thresholds |
//! | `prefs` | Show or change persisted preferences |
//!
//! # Configuration
//!
//! Settings are read from `<config_dir>/hapag/client.toml` (or `--config`).
//! See [`config::Config`] for the available keys. `--url` overrides the
//! backend URL from the file.

pub mod cli;
pub mod commands;
pub mod config;
pub mod view;
