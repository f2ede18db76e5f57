//! Persistent user preferences.
//!
//! A flat JSON object of string keys, stored at
//! `<config_dir>/hapag/preferences.json`. The only key the dashboard reads
//! today is [`AUTO_REFRESH_KEY`]; other keys are kept as-is on save.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Whether the sensor poller starts automatically.
pub const AUTO_REFRESH_KEY: &str = "autoRefresh";

/// Default location of the preference store.
pub fn default_preferences_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hapag")
        .join("preferences.json")
}

/// Key/value preference store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl Preferences {
    /// Open the store at [`default_preferences_path`].
    pub fn load() -> Result<Self> {
        Self::open(default_preferences_path())
    }

    /// Open the store at `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| Error::PreferencesFormat {
                    path: path.clone(),
                    source,
                })?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No preference store at {}", path.display());
                BTreeMap::new()
            }
            Err(source) => return Err(Error::Preferences { path, source }),
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Read a boolean. Accepts JSON booleans and the strings `"true"`/`"false"`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether polling starts automatically. Defaults to `true` when unset.
    pub fn auto_refresh(&self) -> bool {
        self.get_bool(AUTO_REFRESH_KEY).unwrap_or(true)
    }

    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.set(AUTO_REFRESH_KEY, enabled);
    }

    /// Write the store, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| Error::Preferences {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content =
            serde_json::to_string_pretty(&self.values).map_err(|source| {
                Error::PreferencesFormat {
                    path: self.path.clone(),
                    source,
                }
            })?;
        fs::write(&self.path, content).map_err(|source| Error::Preferences {
            path: self.path.clone(),
            source,
        })?;

        debug!("Saved preferences to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_and_auto_refresh_on() {
        let dir = TempDir::new().unwrap();
        let prefs = Preferences::open(dir.path().join("preferences.json")).unwrap();
        assert!(prefs.get(AUTO_REFRESH_KEY).is_none());
        assert!(prefs.auto_refresh());
    }

    #[test]
    fn test_round_trip_through_nested_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("preferences.json");

        let mut prefs = Preferences::open(&path).unwrap();
        prefs.set_auto_refresh(false);
        prefs.set("theme", "dark");
        prefs.save().unwrap();

        let reopened = Preferences::open(&path).unwrap();
        assert!(!reopened.auto_refresh());
        assert_eq!(reopened.get("theme"), Some(&Value::from("dark")));
    }

    #[test]
    fn test_string_booleans_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"autoRefresh": "false"}"#).unwrap();

        let prefs = Preferences::open(&path).unwrap();
        assert_eq!(prefs.get_bool(AUTO_REFRESH_KEY), Some(false));
        assert!(!prefs.auto_refresh());
    }

    #[test]
    fn test_non_boolean_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, r#"{"autoRefresh": 0}"#).unwrap();

        let prefs = Preferences::open(&path).unwrap();
        assert_eq!(prefs.get_bool(AUTO_REFRESH_KEY), None);
        assert!(prefs.auto_refresh());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            Preferences::open(&path),
            Err(Error::PreferencesFormat { .. })
        ));
    }

    #[test]
    fn test_remove_key() {
        let dir = TempDir::new().unwrap();
        let mut prefs = Preferences::open(dir.path().join("p.json")).unwrap();
        prefs.set_auto_refresh(false);
        assert_eq!(prefs.remove(AUTO_REFRESH_KEY), Some(Value::Bool(false)));
        assert!(prefs.auto_refresh());
    }

    #[test]
    fn test_default_path_ends_with_store_name() {
        let path = default_preferences_path();
        assert!(path.ends_with("hapag/preferences.json"));
    }
}
