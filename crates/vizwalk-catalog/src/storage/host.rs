//! Host-provided storage
//!
//! [`HostBackend`] adapts any [`HostStorage`] capability. [`JsonFileHostStorage`]
//! is the capability a desktop host exposes: the whole catalog in one JSON file.

use super::{decode_catalog, BackendKind, HostStorage, StorageBackend};
use crate::error::StorageError;
use crate::record::ProjectRecord;
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Backend over a host storage capability
#[derive(Debug, Clone)]
pub struct HostBackend {
    host: Arc<dyn HostStorage>,
}

impl HostBackend {
    /// Wrap a host capability
    #[inline]
    #[must_use]
    pub fn new(host: Arc<dyn HostStorage>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl StorageBackend for HostBackend {
    async fn load(&self) -> Result<Vec<ProjectRecord>, StorageError> {
        let value = self.host.load_projects().await?;
        decode_catalog(value)
    }

    async fn save(&self, records: &[ProjectRecord]) -> Result<(), StorageError> {
        self.host.save_projects(records).await
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Host
    }
}

/// Host capability keeping the catalog in a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileHostStorage {
    path: PathBuf,
}

impl JsonFileHostStorage {
    /// Store at `path`; the file is created on first save
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HostStorage for JsonFileHostStorage {
    async fn load_projects(&self) -> Result<Value, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Value::Array(Vec::new())),
            Err(e) => return Err(StorageError::Read(format!("{}: {e}", self.path.display()))),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save_projects(&self, records: &[ProjectRecord]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write-then-rename keeps the catalog file whole
        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StorageError::Write(format!("{}: {e}", self.path.display())))
    }
}
