use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "SNIPPETVAULT_HOME";
pub const DB_FILENAME: &str = "snippets.json";
pub const API_PORT_FILENAME: &str = "api_port.txt";
pub const SETTINGS_FILENAME: &str = "settings.json";
pub const DEFAULT_API_PORT: u16 = 3000;

/// User-tunable settings read from `settings.json` in the config directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_port: u16,
    /// Where `export` writes files when no `--output` is given.
    pub export_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_port: DEFAULT_API_PORT,
            export_dir: None,
        }
    }
}

/// Get the snippetvault configuration directory
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = env::var(HOME_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".snippetvault"))
        .unwrap_or_else(|_| PathBuf::from(".snippetvault"))
}

/// Ensure the configuration directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let config_dir = get_config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
        tracing::info!(path = %config_dir.display(), "created config directory");
    }
    Ok(config_dir)
}

/// Get the path to the snippet database file
pub fn get_db_file_path() -> PathBuf {
    get_config_dir().join(DB_FILENAME)
}

/// Get the path to the file recording the API server port
pub fn get_api_port_file_path() -> PathBuf {
    get_config_dir().join(API_PORT_FILENAME)
}

/// Load settings from the config directory, falling back to defaults.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(&get_config_dir().join(SETTINGS_FILENAME))
}

pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_json::from_str(&content)
        .map_err(|e| VaultError::InvalidConfig(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_settings_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join(SETTINGS_FILENAME)).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.api_port, DEFAULT_API_PORT);
    }

    #[test]
    fn partial_settings_keep_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, r#"{ "exportDir": "/tmp/out" }"#).unwrap();

        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings.api_port, DEFAULT_API_PORT);
        assert_eq!(settings.export_dir, Some(PathBuf::from("/tmp/out")));
    }

    #[test]
    fn malformed_settings_are_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILENAME);
        fs::write(&path, "{ not json").unwrap();

        let err = load_settings_from(&path).unwrap_err();
        assert!(matches!(err, VaultError::InvalidConfig(_)));
    }
}
