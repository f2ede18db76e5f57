//! Preference management commands.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use hapag_core::{AUTO_REFRESH_KEY, Preferences};

use super::AppContext;
use crate::cli::PrefsAction;

pub fn cmd_prefs(ctx: &AppContext, action: &PrefsAction) -> Result<()> {
    let mut prefs = ctx.preferences()?;

    match action {
        PrefsAction::Show => {
            println!("{}", format_prefs(&prefs, ctx.no_color));
        }
        PrefsAction::AutoRefresh { state } => {
            prefs.set_auto_refresh(state.enabled());
            prefs.save().context("Failed to save preferences")?;
            if !ctx.quiet {
                println!(
                    "Auto-refresh {}",
                    if state.enabled() { "enabled" } else { "disabled" }
                );
            }
        }
    }
    Ok(())
}

fn format_prefs(prefs: &Preferences, no_color: bool) -> String {
    let header = format!("Preferences ({})", prefs.path().display());
    let mut out = if no_color {
        header
    } else {
        header.bold().to_string()
    };

    // Always shown, with its effective value when unset.
    if prefs.get(AUTO_REFRESH_KEY).is_none() {
        out.push_str(&format!(
            "\n  {} = {} (default)",
            AUTO_REFRESH_KEY,
            prefs.auto_refresh()
        ));
    }
    for (key, value) in prefs.iter() {
        out.push_str(&format!("\n  {} = {}", key, value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_default_auto_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = Preferences::open(dir.path().join("preferences.json")).unwrap();
        let text = format_prefs(&prefs, true);
        assert!(text.ends_with("autoRefresh = true (default)"));
    }

    #[test]
    fn test_show_stored_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut prefs = Preferences::open(dir.path().join("preferences.json")).unwrap();
        prefs.set_auto_refresh(false);
        let text = format_prefs(&prefs, true);
        assert!(text.ends_with("autoRefresh = false"));
        assert!(!text.contains("(default)"));
    }
}
