//! Persisted key-value state.
//!
//! One JSON document holds everything the app remembers between cold starts:
//! the cached feature flag, the saved destination URL, and the flock records.
//! Keys are flat strings and values are raw JSON, so typed facades
//! ([`LaunchStateStore`], the record managers) stay thin.

mod launch_state;

pub use launch_state::LaunchStateStore;

use crate::error::StoreError;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// String-keyed JSON value store.
///
/// Implementations must be cheap to read; writes go through on every call.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ─── File-backed store ──────────────────────────────────────────────────────

/// Single-file JSON store under the workspace directory.
///
/// Loading is tolerant: a missing file starts empty, a corrupt file is logged
/// and replaced on the next write. Launch resolution must never die on a bad
/// state file.
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => {
                if content.trim().is_empty() {
                    Map::new()
                } else {
                    serde_json::from_str(&content).unwrap_or_else(|error| {
                        tracing::warn!(
                            path = %path.display(),
                            %error,
                            "failed to parse state file; starting empty"
                        );
                        Map::new()
                    })
                }
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "failed to read state file; starting empty"
                );
                Map::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&Value::Object(entries.clone()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }
}

// ─── In-memory store ────────────────────────────────────────────────────────

/// Volatile store for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trips_values() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("state.json");

        let store = JsonFileStore::open(&path);
        store.set("count", json!("https://x.test/go")).expect("set");
        store.set("countState", json!(true)).expect("set");

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("count"), Some(json!("https://x.test/go")));
        assert_eq!(reopened.get("countState"), Some(json!(true)));
    }

    #[test]
    fn missing_file_starts_empty() {
        let tmp = TempDir::new().expect("tempdir");
        let store = JsonFileStore::open(tmp.path().join("absent.json"));
        assert!(store.get("count").is_none());
    }

    #[test]
    fn corrupt_file_starts_empty_and_recovers_on_write() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("state.json");
        fs::write(&path, "{not json at all").expect("write corrupt");

        let store = JsonFileStore::open(&path);
        assert!(store.get("countState").is_none());

        store.set("countState", json!(false)).expect("set");
        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("countState"), Some(json!(false)));
    }

    #[test]
    fn remove_deletes_key() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("state.json");

        let store = JsonFileStore::open(&path);
        store.set("count", json!("url")).expect("set");
        store.remove("count").expect("remove");
        assert!(store.get("count").is_none());

        let reopened = JsonFileStore::open(&path);
        assert!(reopened.get("count").is_none());
    }

    #[test]
    fn remove_of_absent_key_is_ok() {
        let store = MemoryStore::new();
        store.remove("never-set").expect("remove");
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStore::new();
        store.set("chickens", json!([{"name": "Hattie"}])).expect("set");
        assert_eq!(store.get("chickens"), Some(json!([{"name": "Hattie"}])));
    }
}
