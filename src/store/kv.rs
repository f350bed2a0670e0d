// ABOUTME: Durable key-value store the session snapshot is written into across restarts
// JSON file implementation keeps every key in one object and rewrites it atomically

use super::StoreError;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<Map<String, Value>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Map<String, Value>> {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// Key-value store persisted as a single pretty-printed JSON object.
pub struct JsonFileKvStore {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
}

impl JsonFileKvStore {
    /// Open the store, starting empty when the file is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring corrupt state file {:?}: {}", path, e);
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Map<String, Value>> {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for JsonFileKvStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self.lock();
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);
        // Memory only changes once the disk write went through
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.lock();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state").join("session.json");

        let store = JsonFileKvStore::open(&path).unwrap();
        store.set("currentPanel", json!({"id": 3, "file": "a.search"})).unwrap();
        drop(store);

        let reopened = JsonFileKvStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("currentPanel").unwrap(),
            Some(json!({"id": 3, "file": "a.search"}))
        );
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileKvStore::open(&path).unwrap();
        assert_eq!(store.get("currentPanel").unwrap(), None);
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let state_dir = temp_dir.path().join("state");
        let store = JsonFileKvStore::open(state_dir.join("session.json")).unwrap();
        store.set("currentPanel", json!({"id": 2})).unwrap();

        std::fs::remove_dir_all(&state_dir).unwrap();

        assert!(store.set("currentPanel", json!({"id": 3})).is_err());
        assert!(store.set("openPanels", json!([])).is_err());
        assert!(store.remove("currentPanel").is_err());
        assert_eq!(store.get("currentPanel").unwrap(), Some(json!({"id": 2})));
        assert_eq!(store.get("openPanels").unwrap(), None);
    }

    #[test]
    fn test_remove_drops_key() {
        let store = MemoryKvStore::new();
        store.set("openPanels", json!([])).unwrap();
        store.remove("openPanels").unwrap();
        assert_eq!(store.get("openPanels").unwrap(), None);
    }
}
