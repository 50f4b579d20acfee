//! Venue record and the value types it is built from.
//!
//! A [`Venue`] is assembled once per detail page and never mutated afterwards.
//! Every field except `name` and `website` may be absent; absence is a valid,
//! storable state rather than an error.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Upper bound stored for open-ended "from N guests" capacities.
///
/// The store's `integer_range` type needs a finite upper bound.
pub const UNBOUNDED_GUESTS: i64 = 9999;

/// Guest capacity as an inclusive `{gte, lte}` range, matching the store's
/// `integer_range` field layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRange {
    pub gte: i64,
    pub lte: i64,
}

impl GuestRange {
    /// "Up to N" capacity: `{0, N}`.
    #[must_use]
    pub fn up_to(max: i64) -> Self {
        Self { gte: 0, lte: max }
    }

    /// "A to B" capacity. Returns `None` when `min > max`.
    #[must_use]
    pub fn between(min: i64, max: i64) -> Option<Self> {
        (min <= max).then_some(Self { gte: min, lte: max })
    }

    /// "From N" capacity: `{N, UNBOUNDED_GUESTS}`.
    #[must_use]
    pub fn at_least(min: i64) -> Self {
        Self {
            gte: min,
            lte: UNBOUNDED_GUESTS,
        }
    }
}

/// Geographic point in the store's `geo_point` object layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Review score as found on a detail page.
///
/// The source falls back to `0` when a venue shows no score at all. That
/// fallback is kept distinct from a score that is present but unreadable,
/// and from a real score, so downstream consumers can tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ReviewScore {
    /// A score parsed from the page.
    Rated(f64),
    /// The page has no score node. Stored as `0.0`.
    #[default]
    Unrated,
    /// A score node exists but its text is not a number. Stored as `null`.
    Unknown,
}

impl ReviewScore {
    /// Value written to the store and the export.
    #[must_use]
    pub fn stored_value(self) -> Option<f64> {
        match self {
            ReviewScore::Rated(score) => Some(score),
            ReviewScore::Unrated => Some(0.0),
            ReviewScore::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Rural,
    Urban,
}

/// The optional part of a venue, filled in field by field during extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueDetails {
    /// Price in whole currency units.
    pub price: Option<i64>,
    /// `None` means the capacity text matched no known phrasing; the field is
    /// then left out of the stored document entirely.
    pub guests: Option<GuestRange>,
    pub coordinates: Option<Coordinates>,
    pub review_score: ReviewScore,
    /// Whether the page carries a FAQ section.
    pub has_extended_info: bool,
    pub multiple_events_per_day: Option<bool>,
    pub location_type: Option<LocationType>,
}

/// One extracted venue, identified by its display name.
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    name: String,
    website: String,
    details: VenueDetails,
}

impl Venue {
    /// Builds a venue from its name, source URL and extracted details.
    ///
    /// Both `name` and `website` are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingName`] or [`CoreError::MissingWebsite`]
    /// when either is blank.
    pub fn new(
        name: impl Into<String>,
        website: impl Into<String>,
        details: VenueDetails,
    ) -> Result<Self, CoreError> {
        let name = name.into().trim().to_owned();
        let website = website.into().trim().to_owned();

        if name.is_empty() {
            return Err(CoreError::MissingName { website });
        }
        if website.is_empty() {
            return Err(CoreError::MissingWebsite { name });
        }

        Ok(Self {
            name,
            website,
            details,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn website(&self) -> &str {
        &self.website
    }

    #[must_use]
    pub fn price(&self) -> Option<i64> {
        self.details.price
    }

    #[must_use]
    pub fn guests(&self) -> Option<GuestRange> {
        self.details.guests
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.details.coordinates
    }

    #[must_use]
    pub fn review_score(&self) -> ReviewScore {
        self.details.review_score
    }

    #[must_use]
    pub fn has_extended_info(&self) -> bool {
        self.details.has_extended_info
    }

    #[must_use]
    pub fn multiple_events_per_day(&self) -> Option<bool> {
        self.details.multiple_events_per_day
    }

    #[must_use]
    pub fn location_type(&self) -> Option<LocationType> {
        self.details.location_type
    }

    /// Document body written to the store for this venue.
    #[must_use]
    pub fn to_document(&self) -> SinkDocument<'_> {
        SinkDocument {
            name: &self.name,
            price: self.details.price,
            guests: self.details.guests,
            coordinates: self.details.coordinates,
            website: &self.website,
            review_score: self.details.review_score.stored_value(),
            has_more_info: self.details.has_extended_info,
            multiple_events: self.details.multiple_events_per_day,
            location_type: self.details.location_type,
        }
    }
}

/// Store document layout. Field names follow the index mapping.
#[derive(Debug, Serialize)]
pub struct SinkDocument<'a> {
    pub name: &'a str,
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests: Option<GuestRange>,
    pub coordinates: Option<Coordinates>,
    pub website: &'a str,
    pub review_score: Option<f64>,
    pub has_more_info: bool,
    pub multiple_events: Option<bool>,
    pub location_type: Option<LocationType>,
}

#[cfg(test)]
#[path = "venue_test.rs"]
mod tests;
