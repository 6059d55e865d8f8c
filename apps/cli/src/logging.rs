use catalog::CatalogError;
use tracing::error;

/// Plain fmt subscriber at INFO, shared by both binaries
pub fn init() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();
}

/// Log the structured report for library errors before they reach `main`
pub fn report(err: CatalogError) -> anyhow::Error {
    error!("{}", err.detailed_report());
    anyhow::Error::new(err)
}
