use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::settings_store::{SettingsStore, SettingsStoreError};

/// Settings kept as one JSON object in a file
/// The file is read once when opened and rewritten on every `set`
pub struct FileSettingsStore {
    path: PathBuf,
    values: parking_lot::RwLock<Map<String, Value>>,
}

impl FileSettingsStore {
    /// Opens the settings file, a missing or corrupt file opens as empty settings
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsStoreError> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(content) => match serde_json::from_slice::<Map<String, Value>>(&content) {
                Ok(values) => values,
                Err(err) => {
                    tracing::warn!(
                        "Settings file {} is corrupt, starting empty: {}",
                        path.display(),
                        err
                    );
                    Map::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Map::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            values: parking_lot::RwLock::new(values),
        })
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<(), SettingsStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_vec_pretty(values)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>, SettingsStoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), SettingsStoreError> {
        let mut values = self.values.write();
        let mut updated = values.clone();
        updated.insert(key.to_string(), value);
        // Cache only changes once the file holds the new values
        self.persist(&updated)?;
        *values = updated;
        Ok(())
    }
}

#[cfg(test)]
mod file_settings_store_tests {
    use serde_json::json;

    use super::*;

    #[test]
    /// Writes values, reopens the file and reads them back
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let store = FileSettingsStore::open(&path).unwrap();
        assert_eq!(store.get("RecentSearchesKey").unwrap(), None);
        store.set("RecentSearchesKey", json!(["b", "a"])).unwrap();
        store.set("Theme", json!("dark")).unwrap();

        let reopened = FileSettingsStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("RecentSearchesKey").unwrap(),
            Some(json!(["b", "a"]))
        );
        assert_eq!(reopened.get("Theme").unwrap(), Some(json!("dark")));
    }

    #[test]
    fn test_corrupt_file_opens_empty_and_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileSettingsStore::open(&path).unwrap();
        assert_eq!(store.get("RecentSearchesKey").unwrap(), None);

        store.set("RecentSearchesKey", json!(["a"])).unwrap();
        let reopened = FileSettingsStore::open(&path).unwrap();
        assert_eq!(reopened.get("RecentSearchesKey").unwrap(), Some(json!(["a"])));
    }

    #[test]
    /// Replaces the settings directory with a regular file so the write fails
    /// and checks the cached values still match what is on disk
    fn test_failed_write_keeps_previous_values() {
        let dir = tempfile::tempdir().unwrap();
        let settings_dir = dir.path().join("settings");
        let path = settings_dir.join("settings.json");

        let store = FileSettingsStore::open(&path).unwrap();
        store.set("RecentSearchesKey", json!(["emma"])).unwrap();

        fs::remove_dir_all(&settings_dir).unwrap();
        fs::write(&settings_dir, "not a directory").unwrap();

        let result = store.set("RecentSearchesKey", json!(["dune", "emma"]));
        assert!(matches!(result, Err(SettingsStoreError::Io(..))));
        assert_eq!(
            store.get("RecentSearchesKey").unwrap(),
            Some(json!(["emma"]))
        );
    }
}
