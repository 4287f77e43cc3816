//! Vizwalk Catalog - project catalog core for walkthrough experiences
//!
//! The non-visual part of the Vizwalk front-end:
//! - Persists the project catalog against a host capability or a
//!   browser-style key/value store, degrading to in-memory
//! - Resolves stored asset references for the current execution context
//! - Searches and groups the catalog by category
//! - Builds launch references for experiences, galleries and videos
//!
//! # Example
//!
//! ```rust,ignore
//! use vizwalk_catalog::prelude::*;
//!
//! # async fn example() {
//! let config = CatalogConfig::new();
//! let gateway = PersistenceGateway::detect(StorageCapabilities::none(), &config);
//! let mut catalog = Catalog::open(config, gateway).await;
//!
//! let draft = catalog.draft().named("Emirates Tower", "Lobby");
//! let record = catalog.add(draft).await?;
//!
//! let target = catalog.launch(&record.slot_id, &ExecutionContext::browser())?;
//! println!("open {}", target.reference());
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod capture;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod index;
pub mod launch;
pub mod path;
pub mod record;
pub mod storage;

// Re-exports for convenience
pub use capture::{capture_drop, DropRejection, DropSlot, DroppedFile, DroppedItem};
pub use catalog::Catalog;
pub use config::CatalogConfig;
pub use error::{CatalogError, LaunchError, Result, StorageError, ValidationError};
pub use gateway::{PersistenceGateway, StorageCapabilities};
pub use index::{normalize, CatalogIndex, CategoryGroup};
pub use launch::{
    project_slug, session_id, slugify, LaunchClock, LaunchSessionBuilder, LaunchTarget,
    SystemClock, VideoTarget,
};
pub use path::{classify, resolve, ExecutionContext, ReferenceKind};
pub use record::{format_area, ProjectDraft, ProjectRecord};
pub use storage::{
    BackendKind, DirectoryKeyValueStore, HostBackend, HostStorage, JsonFileHostStorage,
    KeyValueStore, LocalStoreBackend, MemoryKeyValueStore, StorageBackend, UnavailableBackend,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the catalog
    pub use crate::{
        Catalog, CatalogConfig, CategoryGroup, ExecutionContext, LaunchSessionBuilder,
        LaunchTarget, PersistenceGateway, ProjectDraft, ProjectRecord, StorageCapabilities,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
