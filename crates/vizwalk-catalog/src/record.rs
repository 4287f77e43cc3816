//! Project records and add-form drafts
//!
//! [`ProjectRecord`] is one catalog entry. It serializes with the field names
//! existing catalogs were written with, and deserializes leniently: missing
//! fields default, numbers and nulls in text fields are accepted.

use crate::config::CatalogConfig;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One catalog entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Business-unit grouping key
    #[serde(rename = "sbu", default, deserialize_with = "lenient_string")]
    pub category: String,

    /// Project name, non-empty at creation
    #[serde(default, deserialize_with = "lenient_string")]
    pub project_name: String,

    /// Build name, non-empty at creation
    #[serde(default, deserialize_with = "lenient_string")]
    pub build_name: String,

    /// Build version label
    #[serde(default, deserialize_with = "lenient_string")]
    pub build_version: String,

    /// Area as entered; see [`format_area`]
    #[serde(default, deserialize_with = "lenient_string")]
    pub area_sqft: String,

    /// Construction type
    #[serde(default, deserialize_with = "lenient_string")]
    pub industry: String,

    /// Design style
    #[serde(default, deserialize_with = "lenient_string")]
    pub design_style: String,

    /// Thumbnail URL, local path or blob reference
    #[serde(rename = "thumb", default, deserialize_with = "lenient_string")]
    pub thumbnail_ref: String,

    /// Video URL, local path or blob reference
    #[serde(rename = "youtube", default, deserialize_with = "lenient_string")]
    pub video_ref: String,

    /// Identifier in the third-party viewer
    #[serde(rename = "vizdomId", default, deserialize_with = "lenient_string")]
    pub external_viewer_id: String,

    /// URL, relative route or local executable path
    #[serde(rename = "url", default, deserialize_with = "lenient_string")]
    pub launch_ref: String,

    /// Display slot name (the project name at creation)
    #[serde(default, deserialize_with = "lenient_string")]
    pub project_slot: String,

    /// Stable identity assigned once at creation
    #[serde(rename = "projectSlotId", default, deserialize_with = "lenient_string")]
    pub slot_id: String,

    /// Upload identifier, empty until an upload pipeline assigns one
    #[serde(default, deserialize_with = "lenient_string")]
    pub upload_id: String,
}

impl ProjectRecord {
    /// Build label: build name, then project name, then `fallback`
    #[must_use]
    pub fn build_label<'a>(&'a self, fallback: &'a str) -> &'a str {
        [self.build_name.as_str(), self.project_name.as_str()]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(fallback)
    }

    /// Text searched by the catalog index
    #[must_use]
    pub fn haystack(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.project_name,
            self.build_name,
            self.area_sqft,
            self.industry,
            self.design_style,
            self.category
        )
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(D::Error::custom(format!(
            "expected text, found {other}"
        ))),
    }
}

/// Add-form payload before validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    /// Business-unit grouping key
    pub category: String,
    /// Project name (required)
    pub project_name: String,
    /// Build name (required)
    pub build_name: String,
    /// Build version label
    pub build_version: String,
    /// Area as entered
    pub area_sqft: String,
    /// Construction type
    pub industry: String,
    /// Design style
    pub design_style: String,
    /// Thumbnail reference
    pub thumbnail_ref: String,
    /// Video reference
    pub video_ref: String,
    /// Third-party viewer id
    pub external_viewer_id: String,
    /// Launch reference
    pub launch_ref: String,
}

impl ProjectDraft {
    /// Empty draft with the configured category and version pre-filled
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            category: config.default_category.clone(),
            build_version: config.default_build_version.clone(),
            ..Self::default()
        }
    }

    /// With project and build names
    #[inline]
    #[must_use]
    pub fn named(mut self, project_name: impl Into<String>, build_name: impl Into<String>) -> Self {
        self.project_name = project_name.into();
        self.build_name = build_name.into();
        self
    }

    /// With category
    #[inline]
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// With launch reference
    #[inline]
    #[must_use]
    pub fn with_launch_ref(mut self, launch_ref: impl Into<String>) -> Self {
        self.launch_ref = launch_ref.into();
        self
    }

    /// Check the two required fields
    ///
    /// # Errors
    /// Returns the first blank required field
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_name.trim().is_empty() {
            return Err(ValidationError::MissingProjectName);
        }
        if self.build_name.trim().is_empty() {
            return Err(ValidationError::MissingBuildName);
        }
        Ok(())
    }

    /// Validate and turn into a record, assigning the slot id
    ///
    /// # Errors
    /// Returns [`ValidationError`] if a required field is blank
    pub fn into_record(self, created_at: DateTime<Utc>) -> Result<ProjectRecord, ValidationError> {
        self.validate()?;

        let slot_id = format!("{}-{}", self.project_name, created_at.timestamp_millis());
        Ok(ProjectRecord {
            category: self.category,
            project_slot: self.project_name.clone(),
            project_name: self.project_name,
            build_name: self.build_name,
            build_version: self.build_version,
            area_sqft: self.area_sqft,
            industry: self.industry,
            design_style: self.design_style,
            thumbnail_ref: self.thumbnail_ref,
            video_ref: self.video_ref,
            external_viewer_id: self.external_viewer_id,
            launch_ref: self.launch_ref,
            slot_id,
            upload_id: String::new(),
        })
    }

    /// Clear everything except category and version, ready for the next entry
    pub fn reset(&mut self) {
        *self = Self {
            category: std::mem::take(&mut self.category),
            build_version: std::mem::take(&mut self.build_version),
            ..Self::default()
        };
    }
}

/// Format an area for display
///
/// Commas are stripped before parsing. A finite positive number is rendered
/// with digit grouping and a `sqft` suffix; anything else comes back as given.
#[must_use]
pub fn format_area(raw: &str) -> String {
    let cleaned = raw.replace(',', "");
    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => {
            format!("{} sqft", group_digits(value))
        }
        _ => raw.to_string(),
    }
}

fn group_digits(value: f64) -> String {
    let fixed = format!("{value:.3}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        grouped
    } else {
        format!("{grouped}.{frac_part}")
    }
}
