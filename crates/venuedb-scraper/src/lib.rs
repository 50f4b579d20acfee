//! Listing walker and detail-page extraction for venuedb.
//!
//! Walks a paginated listing site, harvests detail-page links, extracts each
//! venue's fields independently, resolves its address through a geocoder, and
//! assembles the results into a [`venuedb_core::VenueMap`].

pub mod error;
pub mod extract;
pub mod fetch;
pub mod geocode;
pub mod record;
pub mod rules;
pub mod walker;

mod rate_limit;

pub use error::ScraperError;
pub use extract::{DetailFields, Extractor};
pub use fetch::{PageClient, PageSource};
pub use geocode::{Geocoder, NominatimClient};
pub use record::VenueDraft;
pub use rules::ExtractionRules;
pub use walker::{listing_page_url, ListingWalker, WalkOutput, WalkStats};
