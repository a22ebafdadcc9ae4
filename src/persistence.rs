use directories::ProjectDirs;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

pub const SELECTED_THEME_KEY: &str = "selectedTheme";
pub const AUTO_CHANGE_THEME_KEY: &str = "autoChangeTheme";
pub const LANGUAGE_KEY: &str = "language";

/// String key-value storage for user preferences.
pub trait PreferenceStorage: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Location of the preference file inside the platform data directory.
pub fn default_preferences_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "portfolio", "portfolio-tui").ok_or(Error::NoProjectDirs)?;
    Ok(proj_dirs.data_dir().join("preferences.json"))
}

/// Preferences stored as a flat JSON object of strings.
///
/// Every write re-reads the file and merges the new key in, so several
/// handles on the same path (theme store, language switcher) never clobber
/// each other's keys.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStorage {
    /// Open the file at `path`. A missing file is an empty store; a corrupt
    /// one is copied aside to `<path>.backup` and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_values(&path);
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_values(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        debug!("No preference file at {}, starting empty", path.display());
        return BTreeMap::new();
    }
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
            Ok(values) => values,
            Err(e) => {
                warn!("Failed to parse {} (using defaults): {}", path.display(), e);
                let backup_path = path.with_extension("json.backup");
                let _ = fs::copy(path, backup_path);
                BTreeMap::new()
            }
        },
        Err(e) => {
            warn!("Failed to read {} (using defaults): {}", path.display(), e);
            BTreeMap::new()
        }
    }
}

impl PreferenceStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut merged = read_values(&self.path);
        merged.insert(key.to_string(), value.to_string());
        self.values = merged;

        let io_err = |source| Error::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json).map_err(io_err)?;
        Ok(())
    }
}

/// In-process storage. Clones share the same map, which lets a test drop a
/// store and "reload" from what it persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let storage = Self::new();
        {
            let mut values = storage.values.lock().unwrap_or_else(|e| e.into_inner());
            for (key, value) in pairs {
                values.insert(key.to_string(), value.to_string());
            }
        }
        storage
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::open(dir.path().join("preferences.json"));
        assert_eq!(storage.get(SELECTED_THEME_KEY), None);
    }

    #[test]
    fn set_creates_parent_dirs_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");
        let mut storage = JsonFileStorage::open(&path);
        storage.set(SELECTED_THEME_KEY, "2").unwrap();
        storage.set(AUTO_CHANGE_THEME_KEY, "false").unwrap();

        let reopened = JsonFileStorage::open(&path);
        assert_eq!(reopened.get(SELECTED_THEME_KEY).as_deref(), Some("2"));
        assert_eq!(reopened.get(AUTO_CHANGE_THEME_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn two_handles_on_one_file_keep_each_others_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let mut themes = JsonFileStorage::open(&path);
        let mut language = JsonFileStorage::open(&path);

        themes.set(SELECTED_THEME_KEY, "1").unwrap();
        language.set(LANGUAGE_KEY, "es").unwrap();

        let reopened = JsonFileStorage::open(&path);
        assert_eq!(reopened.get(SELECTED_THEME_KEY).as_deref(), Some("1"));
        assert_eq!(reopened.get(LANGUAGE_KEY).as_deref(), Some("es"));
    }

    #[test]
    fn corrupt_file_is_backed_up_and_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();

        let storage = JsonFileStorage::open(&path);
        assert_eq!(storage.get(SELECTED_THEME_KEY), None);
        assert!(dir.path().join("preferences.json.backup").exists());
    }

    #[test]
    fn memory_storage_clones_share_values() {
        let storage = MemoryStorage::with_values([(SELECTED_THEME_KEY, "1")]);
        let mut other = storage.clone();
        other.set(AUTO_CHANGE_THEME_KEY, "false").unwrap();
        assert_eq!(storage.get(SELECTED_THEME_KEY).as_deref(), Some("1"));
        assert_eq!(storage.get(AUTO_CHANGE_THEME_KEY).as_deref(), Some("false"));
    }
}
