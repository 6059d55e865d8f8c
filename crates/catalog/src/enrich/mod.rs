//! Enrichment loop
//!
//! Reads the extracted CSV, looks each mod up on Nexus one at a time and
//! appends a [`ModSummary`] per successful lookup. A failed row is recorded
//! in the [`EnrichmentReport`] and the loop moves on.

pub mod report;
pub mod summary;

pub use report::{EnrichmentReport, RowOutcome, SkipReason, SkippedRow};
pub use summary::{ModSummary, SummaryWriter, MISSING_NAME, SUMMARY_HEADERS};

use csv::StringRecord;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::api::NexusMetadata;
use crate::categories::CategoryTable;
use crate::common::files::open_for_read;
use crate::common::{CatalogError, GameDomain, Result};

/// Sequential per-row enrichment against one game
pub struct Enricher<'a> {
    api: &'a dyn NexusMetadata,
    domain: &'a GameDomain,
    categories: &'a CategoryTable,
    request_delay: Duration,
}

impl<'a> Enricher<'a> {
    pub fn new(api: &'a dyn NexusMetadata, domain: &'a GameDomain, categories: &'a CategoryTable) -> Self {
        Self {
            api,
            domain,
            categories,
            request_delay: Duration::from_secs(1),
        }
    }

    /// Fixed pause after each successful fetch
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Process every row of `input`, writing summaries to `output`
    ///
    /// `output` is truncated to its header before the first lookup. Only file
    /// errors abort the run.
    pub async fn run(&self, input: &Path, output: &Path) -> Result<EnrichmentReport> {
        let started = Instant::now();
        let file = open_for_read(input)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let writer = SummaryWriter::create(output)?;
        let mut report = EnrichmentReport::default();

        for record in reader.records() {
            let record = record.map_err(|e| CatalogError::csv(input, e))?;
            let outcome = self.process_record(&record, &writer).await?;
            report.record(outcome);
        }

        report.elapsed = started.elapsed();
        Ok(report)
    }

    async fn process_record(&self, record: &StringRecord, writer: &SummaryWriter) -> Result<RowOutcome> {
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() < 3 {
            debug!("Line {} has {} columns, skipping", line, record.len());
            return Ok(skipped(line, None, SkipReason::MalformedRow { columns: record.len() }));
        }

        let raw_id = record[2].trim();
        let mod_id = match raw_id.parse::<u64>() {
            Ok(id) => id,
            Err(_) => {
                debug!("Line {} has no usable mod id ('{}'), skipping", line, raw_id);
                return Ok(skipped(line, None, SkipReason::InvalidModId { raw: raw_id.to_string() }));
            }
        };

        let mod_info = match self.api.mod_info(self.domain, mod_id).await {
            Ok(info) => info,
            Err(e) => {
                warn!("Failed to retrieve mod data for ID {}: {}", mod_id, e);
                return Ok(skipped(line, Some(mod_id), SkipReason::FetchFailed { message: e.to_string() }));
            }
        };

        info!("Processing mod ID {}", mod_id);
        sleep(self.request_delay).await;

        let summary = ModSummary::project(&record[0], &record[1], &mod_info, self.categories);
        writer.append(&summary)?;
        info!("Processed and saved mod ID {}", mod_id);

        Ok(RowOutcome::Written { line, mod_id })
    }
}

fn skipped(line: u64, mod_id: Option<u64>, reason: SkipReason) -> RowOutcome {
    RowOutcome::Skipped(SkippedRow { line, mod_id, reason })
}
