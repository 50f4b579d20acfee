//! Assembles extracted fields and a geocoded point into a [`Venue`].
//!
//! Building happens in two steps so the title requirement is checked before
//! any geocoder traffic is spent on a page that will be dropped anyway.

use venuedb_core::{Coordinates, Venue, VenueDetails};

use crate::error::ScraperError;
use crate::extract::DetailFields;

/// Detail fields that passed the title check, waiting for coordinates.
#[derive(Debug, Clone)]
pub struct VenueDraft {
    name: String,
    website: String,
    fields: DetailFields,
}

impl VenueDraft {
    /// Starts a record for the page at `website`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingTitle`] when the page had no usable
    /// title; the caller skips such pages.
    pub fn from_fields(mut fields: DetailFields, website: &str) -> Result<Self, ScraperError> {
        let name = fields
            .title
            .take()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ScraperError::MissingTitle {
                url: website.to_owned(),
            })?;
        Ok(Self {
            name,
            website: website.to_owned(),
            fields,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address text to geocode, if the page had one.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.fields.address.as_deref()
    }

    /// Completes the record with the geocoding outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidVenue`] if the website is blank.
    pub fn finish(self, coordinates: Option<Coordinates>) -> Result<Venue, ScraperError> {
        let DetailFields {
            price,
            guests,
            review_score,
            has_extended_info,
            multiple_events_per_day,
            location_type,
            ..
        } = self.fields;

        let details = VenueDetails {
            price,
            guests,
            coordinates,
            review_score,
            has_extended_info,
            multiple_events_per_day,
            location_type,
        };
        Ok(Venue::new(self.name, self.website, details)?)
    }
}
