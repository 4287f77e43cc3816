//! Catalog search and category grouping
//!
//! Provides [`CatalogIndex`], which turns the raw record sequence and a
//! search string into ordered category groups.
//!
//! # Ordering contract
//! - Pinned categories come first, in configured order, matched
//!   case-insensitively.
//! - Every other category follows in first-seen order. There is no
//!   alphabetical sort.
//! - Records inside a group keep catalog order.

use crate::config::CatalogConfig;
use crate::record::ProjectRecord;
use indexmap::IndexMap;

/// Normalize text for matching
///
/// Lower-cases, turns underscores into spaces, collapses whitespace runs and
/// trims. Idempotent.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// One category and its matching records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    /// Category as stored, or the uncategorized label
    pub key: String,
    /// Matching records in catalog order
    pub records: Vec<&'a ProjectRecord>,
}

impl CategoryGroup<'_> {
    /// Number of records in the group
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the group is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Search and grouping over a record sequence
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    pinned: Vec<String>,
    uncategorized: String,
}

impl CatalogIndex {
    /// Build from configuration
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            pinned: config
                .canonical_categories
                .iter()
                .map(|c| c.to_lowercase())
                .collect(),
            uncategorized: config.uncategorized_label.clone(),
        }
    }

    /// Records matching `search`, in catalog order
    ///
    /// An empty (or whitespace-only) search matches everything.
    #[must_use]
    pub fn filter<'a>(&self, records: &'a [ProjectRecord], search: &str) -> Vec<&'a ProjectRecord> {
        let needle = normalize(search);
        if needle.is_empty() {
            return records.iter().collect();
        }
        records
            .iter()
            .filter(|record| normalize(&record.haystack()).contains(&needle))
            .collect()
    }

    /// Filter, then group by category
    #[must_use]
    pub fn query<'a>(&self, records: &'a [ProjectRecord], search: &str) -> Vec<CategoryGroup<'a>> {
        let mut groups: IndexMap<&str, Vec<&'a ProjectRecord>> = IndexMap::new();
        for record in self.filter(records, search) {
            let key = if record.category.trim().is_empty() {
                self.uncategorized.as_str()
            } else {
                record.category.as_str()
            };
            groups.entry(key).or_default().push(record);
        }

        let mut ordered: Vec<CategoryGroup<'a>> = groups
            .into_iter()
            .map(|(key, records)| CategoryGroup {
                key: key.to_string(),
                records,
            })
            .collect();
        // Stable: unpinned keys share one rank and keep first-seen order
        ordered.sort_by_key(|group| self.rank(&group.key));
        ordered
    }

    fn rank(&self, key: &str) -> usize {
        let key = key.to_lowercase();
        self.pinned
            .iter()
            .position(|pinned| *pinned == key)
            .unwrap_or(self.pinned.len())
    }
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self::new(&CatalogConfig::default())
    }
}
