//! Paginated listing traversal.
//!
//! The walk is two-phase: every listing page in the range is fetched and its
//! detail links harvested first, then each detail page is fetched, extracted,
//! geocoded and built in harvest order. All fetches are sequential.

use std::collections::HashSet;

use venuedb_core::{Coordinates, VenueMap};

use crate::error::ScraperError;
use crate::extract::Extractor;
use crate::fetch::PageSource;
use crate::geocode::Geocoder;
use crate::record::VenueDraft;

/// Listing URL for one page index: `<base>&NumPage=<index>`.
///
/// A base without a query string gets `?` instead of `&`.
#[must_use]
pub fn listing_page_url(base: &str, index: u32) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}NumPage={index}")
}

/// Counters reported at the end of a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Listing pages fetched.
    pub pages: u32,
    /// Distinct detail links harvested.
    pub links: usize,
    /// Venues built (before name de-duplication).
    pub venues: usize,
    /// Detail pages that produced no venue.
    pub skipped: usize,
    /// Venues that replaced an earlier one with the same name.
    pub collisions: usize,
}

#[derive(Debug, Clone, Default)]
pub struct WalkOutput {
    pub venues: VenueMap,
    pub stats: WalkStats,
}

/// Drives a [`PageSource`], an [`Extractor`] and a [`Geocoder`] over a page
/// range.
pub struct ListingWalker<'a, S, G> {
    source: &'a S,
    geocoder: &'a G,
    extractor: &'a Extractor,
    listing_url: String,
}

impl<'a, S, G> ListingWalker<'a, S, G>
where
    S: PageSource + Sync,
    G: Geocoder + Sync,
{
    pub fn new(
        source: &'a S,
        geocoder: &'a G,
        extractor: &'a Extractor,
        listing_url: impl Into<String>,
    ) -> Self {
        Self {
            source,
            geocoder,
            extractor,
            listing_url: listing_url.into(),
        }
    }

    /// Walks listing pages `[first_page, last_page)` and builds every venue
    /// they link to.
    ///
    /// Detail pages without a title are logged and skipped. A geocoder
    /// failure leaves that venue without coordinates.
    ///
    /// # Errors
    ///
    /// Any fetch failure on a listing or detail page aborts the walk.
    pub async fn walk(&self, first_page: u32, last_page: u32) -> Result<WalkOutput, ScraperError> {
        let mut stats = WalkStats::default();

        if first_page >= last_page {
            tracing::warn!(first_page, last_page, "empty page range, nothing to walk");
            return Ok(WalkOutput::default());
        }

        let links = self.harvest(first_page, last_page, &mut stats).await?;
        stats.links = links.len();
        tracing::info!(pages = stats.pages, links = stats.links, "listing harvest complete");

        let mut venues = VenueMap::new();
        for link in &links {
            let html = self.source.fetch_page(link).await?;
            let fields = self.extractor.extract_detail(&html, link);

            let draft = match VenueDraft::from_fields(fields, link) {
                Ok(draft) => draft,
                Err(err) => {
                    tracing::warn!(url = %link, error = %err, "skipping detail page");
                    stats.skipped += 1;
                    continue;
                }
            };

            let coordinates = self.locate(&draft).await;
            let venue = match draft.finish(coordinates) {
                Ok(venue) => venue,
                Err(err) => {
                    tracing::warn!(url = %link, error = %err, "skipping detail page");
                    stats.skipped += 1;
                    continue;
                }
            };

            tracing::debug!(venue = %venue.name(), url = %link, "venue extracted");
            stats.venues += 1;
            if let Some(replaced) = venues.insert(venue) {
                stats.collisions += 1;
                tracing::warn!(
                    venue = %replaced.name(),
                    replaced = %replaced.website(),
                    url = %link,
                    "duplicate venue name, keeping the later page"
                );
            }
        }

        tracing::info!(
            venues = venues.len(),
            skipped = stats.skipped,
            collisions = stats.collisions,
            "walk complete"
        );
        Ok(WalkOutput { venues, stats })
    }

    async fn harvest(
        &self,
        first_page: u32,
        last_page: u32,
        stats: &mut WalkStats,
    ) -> Result<Vec<String>, ScraperError> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for index in first_page..last_page {
            let url = listing_page_url(&self.listing_url, index);
            let html = self.source.fetch_page(&url).await?;
            stats.pages += 1;

            let page_links = self.extractor.listing_links(&html, &url);
            if page_links.is_empty() {
                tracing::warn!(page = index, url = %url, "listing page has no detail links");
            }
            for link in page_links {
                if seen.insert(link.clone()) {
                    links.push(link);
                } else {
                    tracing::debug!(url = %link, "link already harvested");
                }
            }
        }

        Ok(links)
    }

    async fn locate(&self, draft: &VenueDraft) -> Option<Coordinates> {
        let Some(address) = draft.address() else {
            tracing::warn!(venue = %draft.name(), "no address found");
            return None;
        };
        match self.geocoder.geocode(address).await {
            Ok(Some(point)) => Some(point),
            Ok(None) => {
                tracing::warn!(venue = %draft.name(), address, "address not found by geocoder");
                None
            }
            Err(err) => {
                tracing::warn!(venue = %draft.name(), address, error = %err, "geocoding failed");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "walker_test.rs"]
mod tests;
