use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::preferences::DEFAULT_ROTATION_INTERVAL;

/// Shortest rotation interval accepted from configuration.
pub const MIN_ROTATION_INTERVAL_MS: u64 = 250;

/// Top-level application configuration loaded from ~/.config/portfolio-tui.toml.
/// Priority order (highest to lowest): CLI args > env vars > TOML config > defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Theme rotation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Milliseconds between automatic theme changes.
    /// Overridden by --rotation-interval-ms or PORTFOLIO_TUI_ROTATION_INTERVAL_MS.
    /// Default: 5000
    pub rotation_interval_ms: Option<u64>,
}

/// Where preferences are persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON preference file.
    /// Overridden by --preferences or PORTFOLIO_TUI_PREFERENCES.
    /// Default: <platform data dir>/preferences.json
    pub path: Option<PathBuf>,
}

/// Sidebar header text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub name: String,
    pub title: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "Sahil Shrivastav".to_string(),
            title: "Software Engineer & Data Analyst".to_string(),
        }
    }
}

impl AppConfig {
    /// Rotation interval with the default and lower bound applied.
    pub fn rotation_interval(&self) -> Duration {
        match self.theme.rotation_interval_ms {
            Some(ms) if ms >= MIN_ROTATION_INTERVAL_MS => Duration::from_millis(ms),
            Some(ms) => {
                warn!(
                    "rotation_interval_ms = {} is below {}; using {}",
                    ms, MIN_ROTATION_INTERVAL_MS, MIN_ROTATION_INTERVAL_MS
                );
                Duration::from_millis(MIN_ROTATION_INTERVAL_MS)
            }
            None => DEFAULT_ROTATION_INTERVAL,
        }
    }
}

/// The default config file content, written on first run.
/// Written as a string so comments are preserved in the file.
const DEFAULT_CONFIG: &str = r#"# portfolio-tui configuration
# Located at ~/.config/portfolio-tui.toml
#
# Priority order for all settings (highest wins):
#   CLI arguments > environment variables > this file > built-in defaults

# [theme]: automatic theme rotation
[theme]
# Milliseconds between automatic theme changes while "Auto" is selected.
# Can also be set via --rotation-interval-ms or PORTFOLIO_TUI_ROTATION_INTERVAL_MS.
# Default: 5000
# rotation_interval_ms = 5000


# [storage]: where the selected theme, auto-rotate flag and language are kept
[storage]
# Path of the JSON preference file.
# Can also be set via --preferences or PORTFOLIO_TUI_PREFERENCES.
# Default: the platform data directory
# path = "/home/me/.local/share/portfolio-tui/preferences.json"


# [profile]: sidebar header
[profile]
name = "Sahil Shrivastav"
title = "Software Engineer & Data Analyst"
"#;

fn get_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config").join("portfolio-tui.toml"))
}

/// Load the application config from ~/.config/portfolio-tui.toml.
/// Creates the file with defaults and comments if it does not exist.
/// Applies environment variable overrides after loading.
pub fn load() -> AppConfig {
    let path = match get_config_path() {
        Some(p) => p,
        None => {
            let mut config = AppConfig::default();
            apply_env_overrides(&mut config);
            return config;
        }
    };

    if !path.exists() {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let _ = fs::write(&path, DEFAULT_CONFIG);
    }

    let mut config = match fs::read_to_string(&path) {
        Ok(contents) => parse(&contents).unwrap_or_else(|e| {
            warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
            AppConfig::default()
        }),
        Err(e) => {
            warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
            AppConfig::default()
        }
    };

    apply_env_overrides(&mut config);
    config
}

fn parse(contents: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str::<AppConfig>(contents)
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(val) = std::env::var("PORTFOLIO_TUI_ROTATION_INTERVAL_MS") {
        match val.parse::<u64>() {
            Ok(ms) => config.theme.rotation_interval_ms = Some(ms),
            Err(_) => warn!("Ignoring PORTFOLIO_TUI_ROTATION_INTERVAL_MS={}: not a number", val),
        }
    }
    if let Ok(val) = std::env::var("PORTFOLIO_TUI_PREFERENCES") {
        if !val.trim().is_empty() {
            config.storage.path = Some(PathBuf::from(val));
        }
    }
}

/// Return the path to the config file for display purposes.
pub fn config_path_display() -> String {
    get_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/portfolio-tui.toml".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_toml() {
        let result = parse(DEFAULT_CONFIG);
        assert!(result.is_ok(), "Default config template must parse cleanly: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.profile.name, "Sahil Shrivastav");
        assert_eq!(config.theme.rotation_interval_ms, None);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.rotation_interval(), DEFAULT_ROTATION_INTERVAL);
        assert!(config.storage.path.is_none());
        assert_eq!(config.profile.title, "Software Engineer & Data Analyst");
    }

    #[test]
    fn rotation_interval_respects_lower_bound() {
        let mut config = parse("[theme]\nrotation_interval_ms = 1200\n").unwrap();
        assert_eq!(config.rotation_interval(), Duration::from_millis(1200));

        config.theme.rotation_interval_ms = Some(10);
        assert_eq!(config.rotation_interval(), Duration::from_millis(MIN_ROTATION_INTERVAL_MS));
    }

    #[test]
    fn storage_path_is_read() {
        let config = parse("[storage]\npath = \"/tmp/prefs.json\"\n").unwrap();
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/prefs.json")));
    }
}
