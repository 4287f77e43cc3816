//! Interactive catalog session
//!
//! [`Catalog`] owns the in-memory record sequence and is the only writer.
//! Mutations persist through the [`PersistenceGateway`], but only once the
//! initial load has finished.

use crate::config::CatalogConfig;
use crate::error::{CatalogError, ValidationError};
use crate::gateway::PersistenceGateway;
use crate::index::{CatalogIndex, CategoryGroup};
use crate::launch::{LaunchClock, LaunchSessionBuilder, LaunchTarget, SystemClock};
use crate::path::ExecutionContext;
use crate::record::{ProjectDraft, ProjectRecord};
use crate::storage::BackendKind;
use std::sync::Arc;

/// The project catalog and its persistence
#[derive(Debug)]
pub struct Catalog {
    config: CatalogConfig,
    gateway: PersistenceGateway,
    index: CatalogIndex,
    launcher: LaunchSessionBuilder,
    clock: Arc<dyn LaunchClock>,
    records: Vec<ProjectRecord>,
    storage_ready: bool,
}

impl Catalog {
    /// Unloaded catalog on the system clock
    #[must_use]
    pub fn new(config: CatalogConfig, gateway: PersistenceGateway) -> Self {
        Self::with_clock(config, gateway, Arc::new(SystemClock::new()))
    }

    /// Unloaded catalog on a specific clock
    #[must_use]
    pub fn with_clock(
        config: CatalogConfig,
        gateway: PersistenceGateway,
        clock: Arc<dyn LaunchClock>,
    ) -> Self {
        Self {
            index: CatalogIndex::new(&config),
            launcher: LaunchSessionBuilder::with_clock(config.clone(), clock.clone()),
            config,
            gateway,
            clock,
            records: Vec::new(),
            storage_ready: false,
        }
    }

    /// Create and load in one step
    pub async fn open(config: CatalogConfig, gateway: PersistenceGateway) -> Self {
        let mut catalog = Self::new(config, gateway);
        catalog.load().await;
        catalog
    }

    /// Load the stored catalog, replacing the in-memory records
    ///
    /// Always leaves the catalog ready, even when nothing could be read.
    pub async fn load(&mut self) -> usize {
        self.records = self.gateway.load().await;
        self.storage_ready = true;
        self.records.len()
    }

    /// Whether the initial load has completed
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.storage_ready
    }

    /// Selected persistence backend
    #[inline]
    #[must_use]
    pub fn backend(&self) -> BackendKind {
        self.gateway.kind()
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// All records in insertion order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fresh add-form draft
    #[inline]
    #[must_use]
    pub fn draft(&self) -> ProjectDraft {
        ProjectDraft::new(&self.config)
    }

    /// Launch builder sharing this catalog's clock
    #[inline]
    #[must_use]
    pub fn launcher(&self) -> &LaunchSessionBuilder {
        &self.launcher
    }

    /// Validate, append and persist a new record
    ///
    /// # Errors
    /// Returns [`ValidationError`] without touching the catalog when a
    /// required field is blank
    pub async fn add(&mut self, draft: ProjectDraft) -> Result<ProjectRecord, ValidationError> {
        let record = draft.into_record(self.clock.now()).map_err(|e| {
            tracing::debug!(field = e.field(), "add rejected");
            e
        })?;

        tracing::info!(slot_id = %record.slot_id, "project added");
        self.records.push(record.clone());
        self.persist().await;
        Ok(record)
    }

    /// Remove every record
    ///
    /// Returns `false` when the catalog was already empty.
    pub async fn clear(&mut self) -> bool {
        if self.records.is_empty() {
            return false;
        }
        self.records.clear();
        if self.storage_ready {
            self.gateway.clear().await;
        } else {
            tracing::debug!("clear before initial load; not persisted");
        }
        true
    }

    /// Grouped, filtered view
    #[must_use]
    pub fn view(&self, query: &str) -> Vec<CategoryGroup<'_>> {
        self.index.query(&self.records, query)
    }

    /// Record by slot id
    #[must_use]
    pub fn find(&self, slot_id: &str) -> Option<&ProjectRecord> {
        self.records.iter().find(|r| r.slot_id == slot_id)
    }

    /// Experience launch for the record with `slot_id`
    ///
    /// # Errors
    /// Returns [`CatalogError::UnknownSlot`] or a launch error
    pub fn launch(&self, slot_id: &str, ctx: &ExecutionContext) -> Result<LaunchTarget, CatalogError> {
        let record = self.require(slot_id)?;
        Ok(self.launcher.build_experience_launch(record, ctx)?)
    }

    /// Gallery route for the record with `slot_id`
    ///
    /// # Errors
    /// Returns [`CatalogError::UnknownSlot`]
    pub fn gallery(&self, slot_id: &str) -> Result<String, CatalogError> {
        let record = self.require(slot_id)?;
        Ok(self.launcher.build_gallery_launch(record))
    }

    fn require(&self, slot_id: &str) -> Result<&ProjectRecord, CatalogError> {
        self.find(slot_id)
            .ok_or_else(|| CatalogError::UnknownSlot(slot_id.to_string()))
    }

    async fn persist(&self) {
        if !self.storage_ready {
            tracing::debug!("catalog changed before initial load; save skipped");
            return;
        }
        self.gateway.save(&self.records).await;
    }
}
