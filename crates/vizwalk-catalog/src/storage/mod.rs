//! Storage backends for the project catalog
//!
//! Provides the [`StorageBackend`] strategy trait and its three
//! implementations:
//! - [`HostBackend`] over a host-provided [`HostStorage`] capability
//! - [`LocalStoreBackend`] over a browser-style [`KeyValueStore`]
//! - [`UnavailableBackend`] when neither exists (in-memory only)
//!
//! The gateway picks one at startup; see [`crate::gateway`].

use crate::error::StorageError;
use crate::record::ProjectRecord;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

mod host;
mod local;

pub use host::{HostBackend, JsonFileHostStorage};
pub use local::{DirectoryKeyValueStore, LocalStoreBackend, MemoryKeyValueStore};

/// Persistence strategy for the catalog
#[async_trait]
pub trait StorageBackend: Send + Sync + Debug {
    /// Read the stored catalog
    ///
    /// A missing value is an empty catalog, not an error.
    async fn load(&self) -> Result<Vec<ProjectRecord>, StorageError>;

    /// Replace the stored catalog
    async fn save(&self, records: &[ProjectRecord]) -> Result<(), StorageError>;

    /// Remove every record
    async fn clear(&self) -> Result<(), StorageError> {
        self.save(&[]).await
    }

    /// Which strategy this is
    fn kind(&self) -> BackendKind;
}

/// Backend classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Host-provided storage capability
    Host,
    /// Browser-style key/value store
    LocalStore,
    /// No persistence; writes are dropped
    Unavailable,
}

impl BackendKind {
    /// Whether writes outlive the process
    #[inline]
    #[must_use]
    pub fn is_persistent(self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

/// Storage capability exposed by a privileged host
#[async_trait]
pub trait HostStorage: Send + Sync + Debug {
    /// Return whatever the host has stored, in any JSON shape
    async fn load_projects(&self) -> Result<Value, StorageError>;

    /// Persist the full catalog
    async fn save_projects(&self, records: &[ProjectRecord]) -> Result<(), StorageError>;
}

/// Synchronous string key/value store, shaped like browser local storage
pub trait KeyValueStore: Send + Sync + Debug {
    /// Read a value
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value; deleting a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Backend used when no storage capability was detected
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBackend;

#[async_trait]
impl StorageBackend for UnavailableBackend {
    async fn load(&self) -> Result<Vec<ProjectRecord>, StorageError> {
        Err(StorageError::Unavailable)
    }

    async fn save(&self, _records: &[ProjectRecord]) -> Result<(), StorageError> {
        Ok(())
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Unavailable
    }
}

/// Adopt a stored JSON value as a catalog
///
/// Anything but an array of record objects is rejected whole.
///
/// # Errors
/// Returns [`StorageError::Malformed`] for non-arrays or bad elements
pub fn decode_catalog(value: Value) -> Result<Vec<ProjectRecord>, StorageError> {
    if !value.is_array() {
        return Err(StorageError::Malformed(format!(
            "expected an array, found {}",
            json_type_name(&value)
        )));
    }
    serde_json::from_value(value).map_err(|e| StorageError::Malformed(e.to_string()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
