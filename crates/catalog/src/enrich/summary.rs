//! Enriched summary rows and their append-only writer

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::api::NexusMod;
use crate::categories::CategoryTable;
use crate::common::files::{create_truncated, open_for_append};
use crate::common::{CatalogError, Result};

/// Header row of the summaries CSV
pub const SUMMARY_HEADERS: [&str; 4] = ["name_from_file", "name_from_mod_info", "summary", "category"];

/// Written when the remote record carries no name
pub const MISSING_NAME: &str = "N/A";

/// One enriched report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModSummary {
    pub name_from_file: String,
    pub name_from_mod_info: String,
    pub summary: String,
    pub category: String,
}

impl ModSummary {
    /// Join a local row with remote metadata and the category table
    ///
    /// An absent or blank remote summary falls back to the local description.
    pub fn project(
        name_from_file: &str,
        local_description: &str,
        mod_info: &NexusMod,
        categories: &CategoryTable,
    ) -> Self {
        let summary = mod_info
            .summary
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(local_description);

        Self {
            name_from_file: name_from_file.to_string(),
            name_from_mod_info: mod_info.name.clone().unwrap_or_else(|| MISSING_NAME.to_string()),
            summary: summary.to_string(),
            category: categories.resolve(mod_info.category_id).to_string(),
        }
    }
}

/// Writes the summaries file one row at a time
///
/// The file is truncated to a header on creation; every `append` reopens it,
/// writes a single record and closes it again, so rows already written
/// survive an interrupted run.
#[derive(Debug, Clone)]
pub struct SummaryWriter {
    path: PathBuf,
}

impl SummaryWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = create_truncated(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(SUMMARY_HEADERS)
            .map_err(|e| CatalogError::csv(path, e))?;
        writer.flush()
            .map_err(|e| CatalogError::csv(path, csv::Error::from(e)))?;

        Ok(Self { path: path.to_path_buf() })
    }

    pub fn append(&self, summary: &ModSummary) -> Result<()> {
        let file = open_for_append(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(summary)
            .map_err(|e| CatalogError::csv(&self.path, e))?;
        writer.flush()
            .map_err(|e| CatalogError::csv(&self.path, csv::Error::from(e)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
