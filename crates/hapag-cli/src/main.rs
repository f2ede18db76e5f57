use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hapag_cli::cli::{Cli, Commands};
use hapag_cli::commands::{
    AppContext, cmd_classify, cmd_forecast, cmd_prefs, cmd_status, cmd_watch,
};
use hapag_cli::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so dashboard output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        // classify needs neither config nor preferences
        Commands::Classify { parameter, value } => cmd_classify(parameter, *value, cli.no_color),
        Commands::Watch { auto_refresh } => cmd_watch(&app_context(&cli)?, *auto_refresh).await,
        Commands::Status { json } => cmd_status(&app_context(&cli)?, *json).await,
        Commands::Forecast { json } => cmd_forecast(&app_context(&cli)?, *json).await,
        Commands::Prefs { action } => cmd_prefs(&app_context(&cli)?, action),
    }
}

/// Load and validate config, then apply global flag overrides.
fn app_context(cli: &Cli) -> Result<AppContext> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_default().context("Failed to load config")?,
    };
    if let Some(url) = &cli.url {
        config.server.url = url.clone();
    }
    config.validate()?;

    Ok(AppContext {
        config,
        no_color: cli.no_color,
        quiet: cli.quiet,
        prefs_path: cli.prefs.clone(),
    })
}
