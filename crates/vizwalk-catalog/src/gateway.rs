//! Persistence gateway
//!
//! Picks one [`StorageBackend`] at startup and turns every persistence
//! failure into a logged, safe default: loads fall back to an empty catalog,
//! failed saves are dropped without retry.

use crate::config::CatalogConfig;
use crate::error::StorageError;
use crate::record::ProjectRecord;
use crate::storage::{
    BackendKind, HostBackend, HostStorage, KeyValueStore, LocalStoreBackend, StorageBackend,
    UnavailableBackend,
};
use std::sync::Arc;

/// Storage capabilities detected in the running environment
#[derive(Debug, Clone, Default)]
pub struct StorageCapabilities {
    /// Host-provided catalog storage
    pub host: Option<Arc<dyn HostStorage>>,
    /// Browser-style key/value store
    pub local: Option<Arc<dyn KeyValueStore>>,
}

impl StorageCapabilities {
    /// No capabilities
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// With host storage
    #[inline]
    #[must_use]
    pub fn with_host(mut self, host: Arc<dyn HostStorage>) -> Self {
        self.host = Some(host);
        self
    }

    /// With a key/value store
    #[inline]
    #[must_use]
    pub fn with_local(mut self, local: Arc<dyn KeyValueStore>) -> Self {
        self.local = Some(local);
        self
    }
}

/// Best-effort catalog persistence
#[derive(Debug)]
pub struct PersistenceGateway {
    backend: Box<dyn StorageBackend>,
}

impl PersistenceGateway {
    /// Select a backend: host storage, then key/value store, then none
    #[must_use]
    pub fn detect(capabilities: StorageCapabilities, config: &CatalogConfig) -> Self {
        let backend: Box<dyn StorageBackend> = match capabilities {
            StorageCapabilities { host: Some(host), .. } => Box::new(HostBackend::new(host)),
            StorageCapabilities {
                local: Some(local), ..
            } => Box::new(LocalStoreBackend::new(local, config.storage_key.clone())),
            StorageCapabilities { .. } => {
                tracing::warn!("{}; catalog changes stay in memory", StorageError::Unavailable);
                Box::new(UnavailableBackend)
            }
        };
        tracing::info!(backend = ?backend.kind(), "persistence backend selected");
        Self { backend }
    }

    /// Use a specific backend
    #[inline]
    #[must_use]
    pub fn with_backend(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Gateway that persists nothing
    #[inline]
    #[must_use]
    pub fn in_memory() -> Self {
        Self::with_backend(UnavailableBackend)
    }

    /// Selected backend
    #[inline]
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Load the stored catalog
    ///
    /// Never fails: a missing backend, missing value or malformed value all
    /// yield an empty catalog.
    pub async fn load(&self) -> Vec<ProjectRecord> {
        match self.backend.load().await {
            Ok(records) => {
                tracing::info!(count = records.len(), "catalog loaded");
                records
            }
            Err(StorageError::Unavailable) => {
                tracing::debug!("no persistence backend; starting with an empty catalog");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "catalog could not be read; starting empty");
                Vec::new()
            }
        }
    }

    /// Persist the full catalog
    ///
    /// Returns whether the write reached the backend. Failures are logged
    /// and dropped.
    pub async fn save(&self, records: &[ProjectRecord]) -> bool {
        match self.backend.save(records).await {
            Ok(()) => {
                tracing::debug!(count = records.len(), backend = ?self.kind(), "catalog saved");
                self.kind().is_persistent()
            }
            Err(e) => {
                tracing::warn!(error = %e, "catalog save failed; change kept in memory only");
                false
            }
        }
    }

    /// Persist an empty catalog
    pub async fn clear(&self) -> bool {
        match self.backend.clear().await {
            Ok(()) => {
                tracing::info!(backend = ?self.kind(), "catalog cleared");
                self.kind().is_persistent()
            }
            Err(e) => {
                tracing::warn!(error = %e, "catalog clear failed");
                false
            }
        }
    }
}
