//! Run steps called from `main` once configuration and logging are set up.

use anyhow::Context;
use venuedb_core::{AppConfig, VenueMap};
use venuedb_scraper::{
    ExtractionRules, Extractor, ListingWalker, NominatimClient, PageClient, WalkOutput,
};
use venuedb_store::ElasticClient;

/// Walks listing pages `[first_page, last_page)` with the configured site,
/// geocoder and request policy.
///
/// # Errors
///
/// Returns an error if a client cannot be built or any page fetch fails.
pub(crate) async fn walk(
    config: &AppConfig,
    first_page: u32,
    last_page: u32,
) -> anyhow::Result<WalkOutput> {
    let source = PageClient::from_config(config).context("failed to build page client")?;
    let geocoder =
        NominatimClient::from_config(config).context("failed to build geocoder client")?;
    let extractor = Extractor::new(ExtractionRules::default())?;

    tracing::info!(
        listing_url = %config.listing_url,
        first_page,
        last_page,
        "walking listing pages"
    );
    let output = ListingWalker::new(&source, &geocoder, &extractor, config.listing_url.as_str())
        .walk(first_page, last_page)
        .await
        .context("listing walk failed")?;
    Ok(output)
}

/// Writes the CSV export to the configured path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub(crate) fn export(config: &AppConfig, venues: &VenueMap) -> anyhow::Result<()> {
    let report = venuedb_store::export_to_path(&config.export_path, venues).with_context(|| {
        format!("failed to write export to {}", config.export_path.display())
    })?;
    println!(
        "exported {} venues to {} ({} incomplete venues left out)",
        report.exported,
        config.export_path.display(),
        report.rejected
    );
    Ok(())
}

/// Ingests every venue into the configured index.
///
/// # Errors
///
/// Returns an error if the sink client cannot be built or any sink call fails.
pub(crate) async fn ingest(
    config: &AppConfig,
    venues: &VenueMap,
    remove_index: bool,
) -> anyhow::Result<()> {
    let sink =
        ElasticClient::from_config(config).context("failed to build Elasticsearch client")?;
    let report = venuedb_store::ingest(&sink, &config.elastic_index, venues, remove_index)
        .await
        .with_context(|| format!("ingestion into index '{}' failed", config.elastic_index))?;
    println!(
        "{} venues attempted: {} already present, {} added, {} without price; {} documents in '{}'",
        report.attempted,
        report.previously_present,
        report.newly_inserted,
        report.skipped_no_price,
        report.total_in_sink,
        config.elastic_index
    );
    Ok(())
}
