//! Catalog configuration
//!
//! Storage key, route names, category pin order and fallback labels.

use serde::{Deserialize, Serialize};

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Key used by the browser-style key/value backend
    pub storage_key: String,
    /// Internal experience route
    pub experience_route: String,
    /// Internal screenshot gallery route
    pub gallery_route: String,
    /// Origin that relative launch references are joined against
    pub app_origin: String,
    /// Categories pinned first, in this order (matched case-insensitively)
    pub canonical_categories: Vec<String>,
    /// Category pre-filled on new drafts
    pub default_category: String,
    /// Group key for records with a blank category
    pub uncategorized_label: String,
    /// `build` label when a record has neither build nor project name
    pub fallback_build_label: String,
    /// Version pre-filled on new drafts
    pub default_build_version: String,
    /// Prefix for third-party viewer links
    pub viewer_base_url: String,
    /// Extensions (without dot, case-insensitive) treated as launchable executables
    pub executable_extensions: Vec<String>,
}

impl CatalogConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With storage key
    #[inline]
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// With application origin
    #[inline]
    #[must_use]
    pub fn with_app_origin(mut self, origin: impl Into<String>) -> Self {
        self.app_origin = origin.into();
        self
    }

    /// With pinned categories
    #[inline]
    #[must_use]
    pub fn with_canonical_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.canonical_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Check whether `path` ends in a configured executable extension
    #[must_use]
    pub fn is_executable_name(&self, path: &str) -> bool {
        let Some((_, ext)) = path.rsplit_once('.') else {
            return false;
        };
        self.executable_extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            storage_key: "vizwalk_projects".to_string(),
            experience_route: "/experience".to_string(),
            gallery_route: "/gallery".to_string(),
            app_origin: "http://localhost".to_string(),
            canonical_categories: vec!["Enterprise".into(), "SME".into(), "US".into()],
            default_category: "Enterprise".to_string(),
            uncategorized_label: "SBU".to_string(),
            fallback_build_label: "Build".to_string(),
            default_build_version: "V1".to_string(),
            viewer_base_url: "https://vizdom.flipspaces.app/user/project/".to_string(),
            executable_extensions: vec!["exe".to_string()],
        }
    }
}
