//! Category reference table stored as CSV
//!
//! File layout: `category_id,name,parent_category`, where a missing parent is
//! written as the literal `None`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::api::NexusCategory;
use crate::common::files::{commit_staged, create_staged, open_for_read};
use crate::common::{CatalogError, Result};

/// Name returned for ids missing from the table
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Token written for categories without a parent
const NO_PARENT: &str = "None";

/// One category of a game's taxonomy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    pub category_id: u32,
    pub name: String,
    pub parent_category: Option<u32>,
}

impl From<&NexusCategory> for CategoryEntry {
    fn from(category: &NexusCategory) -> Self {
        Self {
            category_id: category.category_id,
            name: category.name.clone(),
            parent_category: category.parent_category,
        }
    }
}

/// On-disk shape of a [`CategoryEntry`]
#[derive(Debug, Serialize, Deserialize)]
struct CategoryRecord {
    category_id: u32,
    name: String,
    parent_category: String,
}

impl From<&CategoryEntry> for CategoryRecord {
    fn from(entry: &CategoryEntry) -> Self {
        Self {
            category_id: entry.category_id,
            name: entry.name.clone(),
            parent_category: entry
                .parent_category
                .map(|id| id.to_string())
                .unwrap_or_else(|| NO_PARENT.to_string()),
        }
    }
}

impl CategoryRecord {
    fn into_entry(self, path: &Path) -> Result<CategoryEntry> {
        let parent = self.parent_category.trim();
        let parent_category = if parent.is_empty() || parent == NO_PARENT {
            None
        } else {
            Some(parent.parse::<u32>().map_err(|_| CatalogError::InvalidResponse {
                url: path.display().to_string(),
                message: format!(
                    "category {} has unreadable parent_category '{}'",
                    self.category_id, parent
                ),
            })?)
        };

        Ok(CategoryEntry {
            category_id: self.category_id,
            name: self.name,
            parent_category,
        })
    }
}

/// Write the category table to `path`. Returns the row count.
///
/// Rows go to a staged sibling file that replaces `path` only once complete,
/// so a cache file on disk is never partial.
pub fn write_category_table(path: &Path, entries: &[CategoryEntry]) -> Result<usize> {
    let staged = create_staged(path)?;
    let mut writer = csv::Writer::from_writer(staged);

    if entries.is_empty() {
        // serialize() emits the header lazily, so write it explicitly here
        writer.write_record(["category_id", "name", "parent_category"])
            .map_err(|e| CatalogError::csv(path, e))?;
    }
    for entry in entries {
        writer.serialize(CategoryRecord::from(entry))
            .map_err(|e| CatalogError::csv(path, e))?;
    }
    let staged = writer.into_inner()
        .map_err(|e| CatalogError::csv(path, csv::Error::from(e.into_error())))?;
    commit_staged(staged, path)?;

    debug!("Wrote {} categories to {}", entries.len(), path.display());
    Ok(entries.len())
}

/// Read every entry of a category table
pub fn read_category_entries(path: &Path) -> Result<Vec<CategoryEntry>> {
    let file = open_for_read(path)?;
    let mut reader = csv::Reader::from_reader(file);

    reader
        .deserialize::<CategoryRecord>()
        .map(|record| {
            record
                .map_err(|e| CatalogError::csv(path, e))
                .and_then(|r| r.into_entry(path))
        })
        .collect()
}

/// Lookup from category id to display name
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    names: HashMap<u32, String>,
}

impl CategoryTable {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = CategoryEntry>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|entry| (entry.category_id, entry.name))
                .collect(),
        }
    }

    /// Load the table from a cache file
    pub fn load(path: &Path) -> Result<Self> {
        let table = Self::from_entries(read_category_entries(path)?);
        debug!("Loaded {} categories from {}", table.len(), path.display());
        Ok(table)
    }

    /// Category name for `id`, or [`UNKNOWN_CATEGORY`]
    pub fn resolve(&self, id: Option<u32>) -> &str {
        id.and_then(|id| self.names.get(&id))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
