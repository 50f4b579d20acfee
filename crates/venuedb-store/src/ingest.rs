//! Idempotent ingestion of a venue map into the sink index.
//!
//! A venue is written only when no document with the same `name` is already
//! present, so re-running an ingest over the same data adds nothing.

use venuedb_core::VenueMap;

use crate::elastic::DocumentSink;
use crate::error::StoreError;
use crate::schema::index_mappings;

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Venues eligible for writing: `previously_present + newly_inserted`.
    pub attempted: usize,
    pub previously_present: usize,
    pub newly_inserted: usize,
    pub skipped_no_price: usize,
    /// Document count after the final refresh.
    pub total_in_sink: u64,
}

/// Writes every priced venue in `venues` that `index` does not already hold.
///
/// With `remove_index` the index is dropped first (a missing index is fine).
/// The index is created with the fixed schema when absent.
///
/// # Errors
///
/// Any sink failure aborts the run and is returned as-is.
pub async fn ingest<S>(
    sink: &S,
    index: &str,
    venues: &VenueMap,
    remove_index: bool,
) -> Result<IngestReport, StoreError>
where
    S: DocumentSink + Sync,
{
    if remove_index {
        if sink.delete_index(index).await? {
            tracing::info!(index, "index removed");
        } else {
            tracing::info!(index, "index to remove did not exist");
        }
    }

    if sink.index_exists(index).await? {
        tracing::debug!(index, "index present");
    } else if sink.create_index(index, &index_mappings()).await? {
        tracing::info!(index, "index created");
    } else {
        tracing::debug!(index, "index appeared concurrently, reusing it");
    }

    let mut report = IngestReport::default();
    for venue in venues {
        if venue.price().is_none() {
            tracing::warn!(venue = %venue.name(), "no price, not ingesting");
            report.skipped_no_price += 1;
            continue;
        }

        if sink.count_matching(index, "name", venue.name()).await? > 0 {
            tracing::debug!(venue = %venue.name(), "already present");
            report.previously_present += 1;
            continue;
        }

        let document =
            serde_json::to_value(venue.to_document()).map_err(|e| StoreError::Json {
                context: format!("document for venue {}", venue.name()),
                source: e,
            })?;
        let id = sink.write_document(index, &document, None).await?;
        tracing::debug!(venue = %venue.name(), id = %id, "venue ingested");
        report.newly_inserted += 1;
    }
    report.attempted = report.previously_present + report.newly_inserted;

    sink.refresh_index(index).await?;
    report.total_in_sink = sink.count_all(index).await?;

    tracing::info!(
        index,
        attempted = report.attempted,
        previously_present = report.previously_present,
        newly_inserted = report.newly_inserted,
        skipped_no_price = report.skipped_no_price,
        total_in_sink = report.total_in_sink,
        "ingestion complete"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
