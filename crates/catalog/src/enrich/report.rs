//! Per-row outcomes of the enrichment loop and their aggregate

use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// Why a row produced no summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than the three expected columns
    MalformedRow { columns: usize },
    /// Third column is not a numeric mod id (e.g. a non-Nexus archive)
    InvalidModId { raw: String },
    /// The mod lookup failed
    FetchFailed { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MalformedRow { columns } => write!(f, "expected at least 3 columns, found {}", columns),
            SkipReason::InvalidModId { raw } if raw.is_empty() => write!(f, "no mod id"),
            SkipReason::InvalidModId { raw } => write!(f, "'{}' is not a mod id", raw),
            SkipReason::FetchFailed { message } => write!(f, "fetch failed: {}", message),
        }
    }
}

/// A skipped input row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line in the input CSV
    pub line: u64,
    pub mod_id: Option<u64>,
    pub reason: SkipReason,
}

/// Result of processing one input row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Written { line: u64, mod_id: u64 },
    Skipped(SkippedRow),
}

/// Aggregate of every row outcome in one run
#[derive(Debug, Clone, Default)]
pub struct EnrichmentReport {
    pub rows_seen: usize,
    pub written: usize,
    pub skipped: Vec<SkippedRow>,
    pub elapsed: Duration,
}

impl EnrichmentReport {
    pub fn record(&mut self, outcome: RowOutcome) {
        self.rows_seen += 1;
        match outcome {
            RowOutcome::Written { .. } => self.written += 1,
            RowOutcome::Skipped(row) => self.skipped.push(row),
        }
    }

    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }

    /// Skipped rows whose remote lookup failed
    pub fn fetch_failures(&self) -> impl Iterator<Item = &SkippedRow> {
        self.skipped
            .iter()
            .filter(|row| matches!(row.reason, SkipReason::FetchFailed { .. }))
    }

    pub fn log_summary(&self) {
        info!(
            "Enrichment finished in {:.1}s: {} rows, {} written, {} skipped",
            self.elapsed.as_secs_f64(),
            self.rows_seen,
            self.written,
            self.skip_count()
        );
        for row in &self.skipped {
            match row.mod_id {
                Some(id) => warn!("Skipped line {} (mod ID {}): {}", row.line, id, row.reason),
                None => warn!("Skipped line {}: {}", row.line, row.reason),
            }
        }
    }
}
