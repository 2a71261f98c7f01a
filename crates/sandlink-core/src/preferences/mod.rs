//! Device preferences store.
//!
//! Preferences are string key/value pairs shared between the host and its
//! devices. Devices only read through the [`Preferences`] trait; hosts pick
//! the backing store (in-memory for tests and embedded hosts, one JSON file
//! per namespace for persistent installs).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StorageError;

/// Regex for valid preference namespaces: alphanumeric, dash, underscore only
const NAME_PATTERN: &str = r"^[a-zA-Z0-9_-]+$";

/// Maximum namespace length
const MAX_NAME_LENGTH: usize = 64;

const LOCK_MSG: &str = "preferences lock poisoned";

/// Read/write access to a device's preferences.
///
/// Shared across devices in a host process; implementations use interior
/// mutability so the store can be handed out behind an `Arc`.
pub trait Preferences: Send + Sync {
    /// Read a preference value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a preference value.
    fn set(&self, key: &str, value: &str);

    /// Remove a preference. Returns `false` if the key was not present.
    fn remove(&self, key: &str) -> bool;

    /// All stored keys, sorted.
    fn keys(&self) -> Vec<String>;
}

/// In-memory preferences store.
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryPreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().expect(LOCK_MSG).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .expect(LOCK_MSG)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) -> bool {
        self.values.write().expect(LOCK_MSG).remove(key).is_some()
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.read().expect(LOCK_MSG).keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// On-disk representation of one preferences namespace.
#[derive(Debug, Serialize, Deserialize)]
struct PreferencesFile {
    updated_at: String,
    values: HashMap<String, String>,
}

/// File-backed preferences store.
///
/// Persists one JSON file per namespace under a caller-supplied directory so
/// each plugin keeps its own settings. Values are loaded once on open and
/// written through on every change.
pub struct FilePreferences {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl FilePreferences {
    /// Open (or create) the preferences namespace under `dir`.
    pub fn open(dir: PathBuf, namespace: &str) -> Result<Self, StorageError> {
        validate_name(namespace)?;
        std::fs::create_dir_all(&dir).map_err(StorageError::Io)?;

        let path = dir.join(format!("{}.json", namespace));
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(StorageError::Io)?;
            let file: PreferencesFile =
                serde_json::from_str(&content).map_err(StorageError::Serialization)?;
            file.values
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Write a preference and persist the namespace.
    pub fn set_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .write()
            .expect(LOCK_MSG)
            .insert(key.to_string(), value.to_string());
        self.persist()
    }

    /// Remove a preference and persist the namespace.
    ///
    /// Returns `Ok(false)` if the key was not present.
    pub fn remove_value(&self, key: &str) -> Result<bool, StorageError> {
        let removed = self.values.write().expect(LOCK_MSG).remove(key).is_some();
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    fn persist(&self) -> Result<(), StorageError> {
        let file = PreferencesFile {
            updated_at: chrono::Utc::now().to_rfc3339(),
            values: self.values.read().expect(LOCK_MSG).clone(),
        };
        let content = serde_json::to_string_pretty(&file).map_err(StorageError::Serialization)?;
        std::fs::write(&self.path, content).map_err(StorageError::Io)?;
        Ok(())
    }
}

impl Preferences for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().expect(LOCK_MSG).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.set_value(key, value) {
            warn!("Failed to persist preference '{}': {}", key, e);
        }
    }

    fn remove(&self, key: &str) -> bool {
        match self.remove_value(key) {
            Ok(removed) => removed,
            Err(e) => {
                warn!("Failed to persist removal of '{}': {}", key, e);
                false
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.read().expect(LOCK_MSG).keys().cloned().collect();
        keys.sort();
        keys
    }
}

fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() {
        return Err(StorageError::InvalidName(
            "Namespace cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_NAME_LENGTH {
        return Err(StorageError::InvalidName(format!(
            "Namespace exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        )));
    }

    let name_regex = Regex::new(NAME_PATTERN).unwrap();
    if !name_regex.is_match(name) {
        return Err(StorageError::InvalidName(format!(
            "Namespace '{}' contains invalid characters. Only alphanumeric, dash, and underscore allowed.",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_set_get_remove() {
        let prefs = MemoryPreferences::new();
        assert_eq!(prefs.get("ip"), None);

        prefs.set("ip", "192.168.1.50");
        assert_eq!(prefs.get("ip"), Some("192.168.1.50".to_string()));

        assert!(prefs.remove("ip"));
        assert!(!prefs.remove("ip"));
        assert_eq!(prefs.get("ip"), None);
    }

    #[test]
    fn test_memory_keys_sorted() {
        let prefs = MemoryPreferences::new();
        prefs.set("name", "studio");
        prefs.set("ip", "10.0.0.2");

        assert_eq!(prefs.keys(), vec!["ip".to_string(), "name".to_string()]);
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let prefs = FilePreferences::open(temp_dir.path().to_path_buf(), "sandnet").unwrap();

        prefs.set("ip", "10.1.2.3");
        prefs.set("name", "booth");

        // A second open of the same namespace sees the persisted values.
        let reopened = FilePreferences::open(temp_dir.path().to_path_buf(), "sandnet").unwrap();
        assert_eq!(reopened.get("ip"), Some("10.1.2.3".to_string()));
        assert_eq!(reopened.get("name"), Some("booth".to_string()));
    }

    #[test]
    fn test_file_remove_persists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let prefs = FilePreferences::open(temp_dir.path().to_path_buf(), "sandnet").unwrap();

        prefs.set("ip", "10.1.2.3");
        assert!(prefs.remove("ip"));

        let reopened = FilePreferences::open(temp_dir.path().to_path_buf(), "sandnet").unwrap();
        assert_eq!(reopened.get("ip"), None);
    }

    #[test]
    fn test_file_stamps_updated_at() {
        let temp_dir = tempfile::tempdir().unwrap();
        let prefs = FilePreferences::open(temp_dir.path().to_path_buf(), "sandnet").unwrap();
        prefs.set("ip", "10.1.2.3");

        let content = std::fs::read_to_string(prefs.path()).unwrap();
        let file: PreferencesFile = serde_json::from_str(&content).unwrap();
        assert!(!file.updated_at.is_empty());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("valid-name").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("../etc").is_err());
        assert!(validate_name(&"a".repeat(65)).is_err());
    }
}
