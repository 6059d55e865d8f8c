//! File operation utilities
//!
//! Centralized open helpers so every CSV reader and writer reports the same
//! path-aware errors.

use std::fs::{File, OpenOptions};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::common::{CatalogError, FileOperation, Result};

/// Open an existing file for reading
pub fn open_for_read(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| CatalogError::file_system(path, FileOperation::Read, e))
}

/// Create (or truncate) a file for writing, creating parent directories first
pub fn create_truncated(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| CatalogError::file_system(parent, FileOperation::Create, e))?;
    }

    debug!("Truncating {}", path.display());
    File::create(path).map_err(|e| CatalogError::file_system(path, FileOperation::Create, e))
}

/// Create a hidden temp file next to `path`, to be moved over it by [`commit_staged`]
///
/// Dropping the handle without committing deletes the temp file and leaves
/// `path` untouched.
pub fn create_staged(path: &Path) -> Result<NamedTempFile> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .map_err(|e| CatalogError::file_system(dir, FileOperation::Create, e))?;

    tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| CatalogError::file_system(dir, FileOperation::Create, e))
}

/// Sync a staged file and rename it onto `path`
pub fn commit_staged(staged: NamedTempFile, path: &Path) -> Result<()> {
    staged
        .as_file()
        .sync_all()
        .map_err(|e| CatalogError::file_system(staged.path(), FileOperation::Create, e))?;

    debug!("Moving {} into place at {}", staged.path().display(), path.display());
    staged
        .persist(path)
        .map(|_| ())
        .map_err(|e| CatalogError::file_system(path, FileOperation::Rename, e.error))
}

/// Open a file in append mode; the handle is expected to be dropped right after use
pub fn open_for_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CatalogError::file_system(path, FileOperation::Append, e))
}

/// Read a whole file into a string
pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| CatalogError::file_system(path, FileOperation::Read, e))
}
