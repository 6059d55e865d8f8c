//! Catalog Library
//!
//! Turns a Wabbajack modlist into CSV reports enriched with Nexus Mods
//! metadata. Two independent pipelines share nothing but files on disk:
//!
//! - **Flattening**: the modlist's `Archives` become `Name,Description,modID`
//!   rows ([`flatten_modlist`]).
//! - **Enrichment**: each mod id from that CSV is looked up on Nexus, its
//!   category id is resolved through a per-game category cache, and a
//!   summary row is appended to the report ([`CatalogPipeline`]).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use catalog::{CatalogConfig, CatalogPipeline, GameDomain};
//!
//! # async fn example() -> catalog::Result<()> {
//! // Reads NEXUS_API_KEY (and an optional .env file)
//! let config = CatalogConfig::from_env()?;
//! let domain = GameDomain::parse("skyrimspecialedition")?;
//!
//! let pipeline = CatalogPipeline::from_config(config)?;
//! let report = pipeline.run(&domain).await?;
//! println!("{} written, {} skipped", report.written, report.skip_count());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod categories;
pub mod config;
pub mod common;
pub mod enrich;
pub mod modlist;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use api::{NexusAPI, NexusMetadata, NexusMod, NexusGame, RateLimitStatus};
pub use categories::{CacheEntry, CategoryTable};
pub use config::{CatalogConfig, CatalogConfigBuilder};
pub use common::{CatalogError, GameDomain, Result};
pub use enrich::{EnrichmentReport, ModSummary, RowOutcome, SkipReason};
pub use modlist::{flatten_modlist, ExtractedRow};
pub use pipeline::CatalogPipeline;
