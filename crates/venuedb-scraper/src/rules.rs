//! Site-specific selectors and phrases used by the extractor.
//!
//! The listing site is Spanish-language and its markup uses BEM class names.
//! Everything locale- or markup-specific lives here so a different site (or a
//! redesign of the current one) only needs a new [`ExtractionRules`] value.

use venuedb_core::LocationType;

/// CSS selectors plus the text rules applied to the matched nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRules {
    /// Detail-page links on a listing page (`href` is harvested).
    pub listing_link: String,
    pub title: String,
    pub price: String,
    pub guests: String,
    pub review_score: String,
    /// Presence of this node marks the page as having extended info.
    pub faq_heading: String,
    pub address: String,
    pub faq_question: String,
    pub faq_answer: String,
    pub read_more: String,
    pub text: TextRules,
}

/// Phrases matched against extracted text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRules {
    /// Stripped from the price text before parsing.
    pub currency_symbol: String,
    /// "Up to N" phrasing.
    pub guests_up_to: String,
    /// Separator of the "A to B" phrasing.
    pub guests_range_separator: String,
    /// "From N" phrasing.
    pub guests_from: String,
    /// FAQ question whose answer tells whether several events fit in a day.
    pub multiple_events_question: String,
    pub affirmative: String,
    pub negative: String,
    /// Tried in order against each read-more block.
    pub location_phrases: Vec<(String, LocationType)>,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            listing_link: "a.vendorTile__title".to_owned(),
            title: "h1.storefrontHeading__title".to_owned(),
            price: "span.quickInfo__itemLabel".to_owned(),
            guests: "span.quickInfo__itemValue".to_owned(),
            review_score: "div.storefrontReviewsSummary__punctuationNumber".to_owned(),
            faq_heading: "h2.storefrontFaqs__title".to_owned(),
            address: "span.storefrontHeading__locationName".to_owned(),
            faq_question: "h3.storefrontFaqs__itemTitle".to_owned(),
            faq_answer: "div.storefrontFaqs__itemBlock".to_owned(),
            read_more: "p.app-miniFaqs-read-more".to_owned(),
            text: TextRules::default(),
        }
    }
}

impl Default for TextRules {
    fn default() -> Self {
        Self {
            currency_symbol: "€".to_owned(),
            guests_up_to: "Hasta".to_owned(),
            guests_range_separator: " a ".to_owned(),
            guests_from: "Desde".to_owned(),
            multiple_events_question: "¿Celebras más de un evento al día?".to_owned(),
            affirmative: "Sí".to_owned(),
            negative: "No".to_owned(),
            location_phrases: vec![
                ("En el campo".to_owned(), LocationType::Rural),
                ("En ciudad".to_owned(), LocationType::Urban),
            ],
        }
    }
}
