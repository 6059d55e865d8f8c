//! Category cache lifecycle
//!
//! A cache file, once present, is authoritative: it is never refreshed, even
//! if the remote taxonomy has changed since it was written.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, error, info};

use crate::api::NexusMetadata;
use crate::categories::table::{write_category_table, CategoryEntry, CategoryTable};
use crate::common::{CatalogError, FileOperation, GameDomain, Result};

/// A category cache file on disk
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub path: PathBuf,
    /// Modification time of the file, i.e. when the taxonomy was fetched
    pub fetched_at: SystemTime,
    /// Whether this run performed the fetch
    pub fetched_now: bool,
}

impl CacheEntry {
    /// Inspect `path`; `None` if no cache file exists yet
    pub fn open(path: &Path) -> Result<Option<Self>> {
        match std::fs::metadata(path) {
            Ok(metadata) => Ok(Some(Self {
                path: path.to_path_buf(),
                fetched_at: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                fetched_now: false,
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CatalogError::file_system(path, FileOperation::Metadata, e)),
        }
    }

    /// Existing caches are never considered stale
    pub fn is_fresh(&self) -> bool {
        true
    }

    pub fn age(&self) -> Duration {
        SystemTime::now()
            .duration_since(self.fetched_at)
            .unwrap_or_default()
    }

    pub fn load_table(&self) -> Result<CategoryTable> {
        CategoryTable::load(&self.path)
    }
}

/// Make sure a category cache exists at `path`, fetching game info at most once
///
/// A fetch failure is logged and returned; callers treat it as fatal.
pub async fn ensure_category_cache(
    api: &dyn NexusMetadata,
    domain: &GameDomain,
    path: &Path,
) -> Result<CacheEntry> {
    if let Some(entry) = CacheEntry::open(path)? {
        if entry.is_fresh() {
            debug!("Using category cache {} (age {}s)", path.display(), entry.age().as_secs());
            return Ok(entry);
        }
    }

    info!("Category reference file {} does not exist. Creating it...", path.display());

    let game = match api.game_info(domain).await {
        Ok(game) => game,
        Err(e) => {
            error!("Failed to retrieve game information for {}: {}. Cannot create category reference file.", domain, e);
            return Err(e);
        }
    };

    let entries: Vec<CategoryEntry> = game.categories.iter().map(CategoryEntry::from).collect();
    write_category_table(path, &entries)?;
    info!("Category reference table saved to {} ({} categories)", path.display(), entries.len());

    Ok(CacheEntry {
        path: path.to_path_buf(),
        fetched_at: SystemTime::now(),
        fetched_now: true,
    })
}
