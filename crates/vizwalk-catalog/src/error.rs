//! Error types for the Vizwalk catalog
//!
//! Covers:
//! - Persistence backend absence, read failures and write failures
//! - Add-form validation
//! - Launch URL construction
//!
//! Only validation and launch errors ever reach a caller. Persistence errors
//! are logged by the gateway and degrade to a safe default.

/// Main catalog error type
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Persistence failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Add-form validation failed
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Launch reference could not be built
    #[error("launch failed: {0}")]
    Launch(#[from] LaunchError),

    /// No record carries the requested slot id
    #[error("no project with slot id {0:?}")]
    UnknownSlot(String),
}

impl CatalogError {
    /// Check if the interactive session can keep going on a safe default
    #[inline]
    #[must_use]
    pub fn is_degradable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Persistence errors
///
/// None of these are fatal. The gateway maps reads to an empty catalog and
/// drops failed writes.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No backend was detected; the catalog lives in memory only
    #[error("persistence unavailable")]
    Unavailable,

    /// Backend failed while reading
    #[error("read failed: {0}")]
    Read(String),

    /// Stored value is not a JSON array of project records
    #[error("stored catalog is malformed: {0}")]
    Malformed(String),

    /// Backend failed while writing
    #[error("write failed: {0}")]
    Write(String),

    /// Filesystem error from a file-backed store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    /// Whether this error came from the read path
    #[inline]
    #[must_use]
    pub fn is_read_side(&self) -> bool {
        matches!(self, Self::Read(_) | Self::Malformed(_))
    }
}

/// Required add-form field is missing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `projectName` is blank after trimming
    #[error("project name is required")]
    MissingProjectName,

    /// `buildName` is blank after trimming
    #[error("build name is required")]
    MissingBuildName,
}

impl ValidationError {
    /// Wire name of the offending field
    #[inline]
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingProjectName => "projectName",
            Self::MissingBuildName => "buildName",
        }
    }
}

/// Launch reference errors
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// Launch reference (or the configured origin) is not a valid URL
    #[error("invalid launch url {reference:?}: {source}")]
    InvalidUrl {
        /// The reference that failed to parse
        reference: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },
}

/// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, CatalogError>;
