//! End-to-end enrichment run: category cache, table load, per-mod loop

use tracing::info;

use crate::api::{NexusAPI, NexusMetadata};
use crate::categories::ensure_category_cache;
use crate::config::CatalogConfig;
use crate::common::{GameDomain, Result};
use crate::enrich::{EnrichmentReport, Enricher};

/// Enrichment pipeline bound to one configuration and metadata source
pub struct CatalogPipeline<A: NexusMetadata> {
    config: CatalogConfig,
    api: A,
}

impl CatalogPipeline<NexusAPI> {
    /// Pipeline talking to the configured Nexus endpoint
    pub fn from_config(config: CatalogConfig) -> Result<Self> {
        let api = NexusAPI::new(&config)?;
        Ok(Self::new(config, api))
    }
}

impl<A: NexusMetadata> CatalogPipeline<A> {
    pub fn new(config: CatalogConfig, api: A) -> Self {
        Self { config, api }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Ensure the category cache, then enrich every row of the extracted CSV
    ///
    /// A failed category fetch aborts before the summaries file is touched.
    pub async fn run(&self, domain: &GameDomain) -> Result<EnrichmentReport> {
        let cache_path = self.config.category_cache_path(domain);
        let cache = ensure_category_cache(&self.api, domain, &cache_path).await?;
        let categories = cache.load_table()?;
        info!("Loaded {} categories for {} from {}", categories.len(), domain, cache.path.display());

        let report = Enricher::new(&self.api, domain, &categories)
            .with_request_delay(self.config.request_delay)
            .run(&self.config.extracted_csv, &self.config.summaries_csv)
            .await?;

        report.log_summary();
        Ok(report)
    }
}
