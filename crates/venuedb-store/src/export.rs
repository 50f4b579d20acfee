//! CSV export of complete venues.
//!
//! Only venues with a price, coordinates and a guest range are exported; the
//! rest are logged and counted as rejected.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use venuedb_core::{LocationType, Venue, VenueMap};

use crate::error::StoreError;

/// Column order of the export file.
pub const HEADER: [&str; 11] = [
    "name",
    "price",
    "min_guests",
    "max_guests",
    "latitude",
    "longitude",
    "website",
    "review_score",
    "has_more_info",
    "multiple_events",
    "location_type",
];

/// One line of the export file. `None` cells are written empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow<'a> {
    pub name: &'a str,
    pub price: i64,
    pub min_guests: i64,
    pub max_guests: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub website: &'a str,
    pub review_score: Option<f64>,
    pub has_more_info: bool,
    pub multiple_events: Option<bool>,
    pub location_type: Option<LocationType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub exported: usize,
    pub rejected: usize,
}

impl<'a> ExportRow<'a> {
    /// Builds the row for `venue`, or lists the required fields it lacks.
    fn from_venue(venue: &'a Venue) -> Result<Self, Vec<&'static str>> {
        let mut missing = Vec::new();
        if venue.price().is_none() {
            missing.push("price");
        }
        if venue.coordinates().is_none() {
            missing.push("coordinates");
        }
        if venue.guests().is_none() {
            missing.push("guests");
        }

        match (venue.price(), venue.coordinates(), venue.guests()) {
            (Some(price), Some(point), Some(guests)) => Ok(Self {
                name: venue.name(),
                price,
                min_guests: guests.gte,
                max_guests: guests.lte,
                latitude: point.lat,
                longitude: point.lon,
                website: venue.website(),
                review_score: venue.review_score().stored_value(),
                has_more_info: venue.has_extended_info(),
                multiple_events: venue.multiple_events_per_day(),
                location_type: venue.location_type(),
            }),
            _ => Err(missing),
        }
    }
}

/// Writes the export for `venues` to `writer`. The header row is always
/// written, also when no venue survives the filter.
///
/// # Errors
///
/// Returns [`StoreError::Csv`] if a row cannot be serialised or written.
pub fn write_csv<W: Write>(writer: W, venues: &VenueMap) -> Result<ExportReport, StoreError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(HEADER)?;

    let mut report = ExportReport::default();
    for venue in venues {
        match ExportRow::from_venue(venue) {
            Ok(row) => {
                csv.serialize(&row)?;
                report.exported += 1;
            }
            Err(missing) => {
                tracing::warn!(
                    venue = %venue.name(),
                    missing = %missing.join(", "),
                    "venue incomplete, not exported"
                );
                report.rejected += 1;
            }
        }
    }
    csv.flush()?;

    Ok(report)
}

/// Writes the export to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be created, or
/// [`StoreError::Csv`] on a write failure.
pub fn export_to_path(path: &Path, venues: &VenueMap) -> Result<ExportReport, StoreError> {
    let file = File::create(path)?;
    let report = write_csv(file, venues)?;
    tracing::info!(
        path = %path.display(),
        exported = report.exported,
        rejected = report.rejected,
        "export complete"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
