/// Configuration module for Sketch Practice.
///
/// Settings are read from a `config.json` file located in the
/// platform-specific application data directory
/// (%APPDATA%/SketchPractice/ on Windows). Missing fields fall back to their
/// defaults. The file holds preferences only: no session state (folder,
/// position, chosen interval) is ever written back.
///
/// # Example
///
/// ```rust,no_run
/// use sketch_practice::config::{ensure_config_file, load_config_from, save_config_to};
///
/// let path = ensure_config_file().expect("Failed to create config");
/// let mut config = load_config_from(&path);
/// config.default_interval_secs = 60;
/// save_config_to(&config, &path).expect("Failed to save config");
/// ```
use crate::image_picker::ImageOrder;
use crate::interval::Interval;
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const CONFIG_FILE: &str = "config.json";

/// User preferences
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Interval selected when the app opens, in seconds (1..=3600)
    pub default_interval_secs: u64,
    /// Foreground window poll cadence in milliseconds
    pub monitor_poll_ms: u64,
    /// Mirror the focused window's minimized state onto the app window
    pub mirror_enabled: bool,
    /// Start with the window pinned above other windows
    pub always_on_top: bool,
    /// Display order of images found in a folder
    pub image_order: ImageOrder,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            default_interval_secs: 30,
            monitor_poll_ms: 500,
            mirror_enabled: true,
            always_on_top: false,
            image_order: ImageOrder::Name,
        }
    }
}

impl AppConfig {
    /// Configured default interval, or 30 seconds if the value is out of range
    pub fn default_interval(&self) -> Interval {
        Interval::from_secs(self.default_interval_secs as i64).unwrap_or_else(|e| {
            warn!("Ignoring default_interval_secs from config: {}", e);
            Interval::default()
        })
    }

    pub fn monitor_poll_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_poll_ms.max(50))
    }
}

/// Get the application's data directory
/// Returns %APPDATA%/SketchPractice/ on Windows
/// Creates directory if it doesn't exist
pub fn get_data_directory() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "SketchPractice")
        .ok_or_else(|| anyhow!("Failed to determine user data directory"))?;

    let data_dir = project_dirs.data_dir();

    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    Ok(data_dir.to_path_buf())
}

/// Read a config file, returning defaults if it is missing or malformed
pub fn load_config_from(path: &Path) -> AppConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return AppConfig::default();
    };

    serde_json::from_str(&contents).unwrap_or_else(|e| {
        warn!("Malformed {:?}, using defaults: {}", path, e);
        AppConfig::default()
    })
}

/// Load application configuration from config.json
/// Returns default config if file doesn't exist or on error
pub fn load_config() -> AppConfig {
    match get_data_directory() {
        Ok(data_dir) => load_config_from(&data_dir.join(CONFIG_FILE)),
        Err(_) => AppConfig::default(),
    }
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

/// Write the default config.json on first run so users have a file to edit
pub fn ensure_config_file() -> Result<PathBuf> {
    let path = get_data_directory()?.join(CONFIG_FILE);
    if !path.exists() {
        save_config_to(&AppConfig::default(), &path)?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.default_interval().as_millis(), 30_000);
        assert_eq!(config.monitor_poll_interval(), Duration::from_millis(500));
        assert!(config.mirror_enabled);
        assert!(!config.always_on_top);
        assert_eq!(config.image_order, ImageOrder::Name);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "default_interval_secs": 120, "image_order": "file_system" }"#)
            .unwrap();

        let config = load_config_from(&path);
        assert_eq!(config.default_interval().as_millis(), 120_000);
        assert_eq!(config.image_order, ImageOrder::FileSystem);
        assert!(config.mirror_enabled);
    }

    #[test]
    fn test_out_of_range_interval_falls_back() {
        let config = AppConfig {
            default_interval_secs: 7200,
            ..Default::default()
        };
        assert_eq!(config.default_interval(), Interval::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = AppConfig {
            always_on_top: true,
            monitor_poll_ms: 250,
            ..Default::default()
        };
        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path), config);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_config_from(&path), AppConfig::default());
        assert_eq!(load_config_from(&dir.path().join("missing.json")), AppConfig::default());
    }
}
