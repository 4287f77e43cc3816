//! Browser-style key/value storage
//!
//! [`LocalStoreBackend`] keeps the catalog as a JSON array under one key of a
//! [`KeyValueStore`]. Clearing removes the key rather than writing `[]`.

use super::{decode_catalog, BackendKind, KeyValueStore, StorageBackend};
use crate::error::StorageError;
use crate::record::ProjectRecord;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

/// Backend over a key/value store
#[derive(Debug, Clone)]
pub struct LocalStoreBackend {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl LocalStoreBackend {
    /// Keep the catalog under `key`
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[async_trait]
impl StorageBackend for LocalStoreBackend {
    async fn load(&self) -> Result<Vec<ProjectRecord>, StorageError> {
        let Some(raw) = self.store.get_item(&self.key)? else {
            return Ok(Vec::new());
        };
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let value = serde_json::from_str(&raw)
            .map_err(|e| StorageError::Malformed(e.to_string()))?;
        decode_catalog(value)
    }

    async fn save(&self, records: &[ProjectRecord]) -> Result<(), StorageError> {
        let json = serde_json::to_string(records)?;
        self.store.set_item(&self.key, &json)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove_item(&self.key)
    }

    fn kind(&self) -> BackendKind {
        BackendKind::LocalStore
    }
}

/// Process-local key/value store
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the store holds no keys
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Key/value store with one file per key under a directory
#[derive(Debug, Clone)]
pub struct DirectoryKeyValueStore {
    root: PathBuf,
}

impl DirectoryKeyValueStore {
    /// Store under `root`; the directory is created on first write
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(format!("{file}.json"))
    }
}

impl KeyValueStore for DirectoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.entry_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(e.to_string())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.entry_path(key), value)
            .map_err(|e| StorageError::Write(e.to_string()))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.entry_path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(StorageError::Write(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ProjectRecord {
        ProjectRecord {
            project_name: name.into(),
            build_name: format!("{name} build"),
            ..ProjectRecord::default()
        }
    }

    #[tokio::test]
    async fn missing_key_is_empty_catalog() {
        let backend = LocalStoreBackend::new(Arc::new(MemoryKeyValueStore::new()), "vizwalk_projects");
        assert!(backend.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn round_trip_and_clear_removes_key() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let backend = LocalStoreBackend::new(store.clone(), "vizwalk_projects");

        let records = vec![record("Tower"), record("Marina")];
        backend.save(&records).await.unwrap();
        assert_eq!(backend.load().await.unwrap(), records);

        backend.clear().await.unwrap();
        assert!(store.is_empty());
        assert!(backend.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn garbage_value_is_malformed() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set_item("vizwalk_projects", "{not json").unwrap();
        let backend = LocalStoreBackend::new(store, "vizwalk_projects");

        assert!(matches!(backend.load().await, Err(StorageError::Malformed(_))));
    }

    #[test]
    fn directory_store_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectoryKeyValueStore::new(dir.path());

        store.set_item("../escape", "x").unwrap();
        assert!(dir.path().join("___escape.json").exists());
        assert_eq!(store.get_item("../escape").unwrap().as_deref(), Some("x"));

        store.remove_item("../escape").unwrap();
        store.remove_item("../escape").unwrap();
        assert_eq!(store.get_item("../escape").unwrap(), None);
    }
}
