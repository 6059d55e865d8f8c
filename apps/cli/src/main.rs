//! Enrich `extracted_data_with_id.csv` with Nexus metadata
//!
//! ```bash
//! NEXUS_API_KEY=... mod-summaries skyrimspecialedition
//! ```

mod logging;

use anyhow::Context;
use catalog::{CatalogConfig, CatalogPipeline, GameDomain};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mod-summaries", version, about = "Build mod_summaries.csv from the extracted modlist CSV")]
struct Args {
    /// Nexus game domain, e.g. skyrimspecialedition
    game_domain: GameDomain,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    let config = CatalogConfig::from_env().map_err(logging::report)?;
    let summaries = config.summaries_csv.clone();
    let pipeline = CatalogPipeline::from_config(config).map_err(logging::report)?;

    let report = pipeline
        .run(&args.game_domain)
        .await
        .map_err(logging::report)
        .with_context(|| format!("Enrichment for {} failed", args.game_domain))?;

    if let Some(rate_limit) = pipeline.api().rate_limit_status() {
        info!("{}", rate_limit.format_status());
        info!("{}", rate_limit.time_until_reset());
    }

    info!(
        "Wrote {} of {} rows to {}",
        report.written,
        report.rows_seen,
        summaries.display()
    );
    Ok(())
}
