//! Field extraction from listing and detail pages.
//!
//! Every detail field is extracted on its own: a malformed price or a missing
//! node only empties that one field (with a warning) and never stops the
//! others. The only field the caller must have is the title, and that check
//! belongs to [`crate::record`].

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use venuedb_core::{GuestRange, LocationType, ReviewScore};

use crate::error::ScraperError;
use crate::rules::{ExtractionRules, TextRules};

/// Raw fields extracted from one detail page, before the record is built.
///
/// `address` is kept as text; it is resolved to coordinates separately so the
/// parsed document never lives across a network call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailFields {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub guests: Option<GuestRange>,
    pub review_score: ReviewScore,
    pub has_extended_info: bool,
    pub address: Option<String>,
    pub multiple_events_per_day: Option<bool>,
    pub location_type: Option<LocationType>,
}

struct Selectors {
    listing_link: Selector,
    title: Selector,
    price: Selector,
    guests: Selector,
    review_score: Selector,
    faq_heading: Selector,
    address: Selector,
    faq_question: Selector,
    faq_answer: Selector,
    read_more: Selector,
}

/// Compiled [`ExtractionRules`].
pub struct Extractor {
    selectors: Selectors,
    text: TextRules,
}

fn compile(selector: &str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::InvalidSelector {
        selector: selector.to_owned(),
        reason: e.to_string(),
    })
}

impl Extractor {
    /// Compiles the selectors in `rules`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] for the first selector that
    /// is not valid CSS.
    pub fn new(rules: ExtractionRules) -> Result<Self, ScraperError> {
        let selectors = Selectors {
            listing_link: compile(&rules.listing_link)?,
            title: compile(&rules.title)?,
            price: compile(&rules.price)?,
            guests: compile(&rules.guests)?,
            review_score: compile(&rules.review_score)?,
            faq_heading: compile(&rules.faq_heading)?,
            address: compile(&rules.address)?,
            faq_question: compile(&rules.faq_question)?,
            faq_answer: compile(&rules.faq_answer)?,
            read_more: compile(&rules.read_more)?,
        };
        Ok(Self {
            selectors,
            text: rules.text,
        })
    }

    /// Harvests detail-page links from a listing page.
    ///
    /// Relative `href`s are resolved against `page_url`; anchors without an
    /// `href` are ignored.
    #[must_use]
    pub fn listing_links(&self, html: &str, page_url: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let base = Url::parse(page_url).ok();

        document
            .select(&self.selectors.listing_link)
            .filter_map(|anchor| {
                let Some(href) = anchor.value().attr("href").map(str::trim) else {
                    tracing::debug!(page = page_url, "listing anchor without href");
                    return None;
                };
                if href.is_empty() {
                    return None;
                }
                match &base {
                    Some(base) => match base.join(href) {
                        Ok(url) => Some(String::from(url)),
                        Err(e) => {
                            tracing::warn!(
                                href,
                                page = page_url,
                                error = %e,
                                "unresolvable listing link"
                            );
                            None
                        }
                    },
                    None => Some(href.to_owned()),
                }
            })
            .collect()
    }

    /// Extracts every detail field from one page.
    ///
    /// `url` is only used for log context.
    #[must_use]
    pub fn extract_detail(&self, html: &str, url: &str) -> DetailFields {
        let document = Html::parse_document(html);
        let s = &self.selectors;

        let title = first_text(&document, &s.title).filter(|t| !t.is_empty());

        let price = match first_text(&document, &s.price) {
            Some(text) => {
                let price = parse_price(&text, &self.text.currency_symbol);
                if price.is_none() {
                    tracing::warn!(url, text = %text, "price is not an integer");
                }
                price
            }
            None => {
                tracing::warn!(url, "no price info found");
                None
            }
        };

        let guests = match first_text(&document, &s.guests) {
            Some(text) => {
                let guests = parse_guests(&text, &self.text);
                if guests.is_none() {
                    tracing::warn!(url, text = %text, "unrecognized guest capacity");
                }
                guests
            }
            None => {
                tracing::warn!(url, "no guest capacity info found");
                None
            }
        };

        let review_score = match first_text(&document, &s.review_score) {
            Some(text) => parse_review_score(&text).map_or_else(
                || {
                    tracing::warn!(url, text = %text, "review score is not a number");
                    ReviewScore::Unknown
                },
                ReviewScore::Rated,
            ),
            None => {
                tracing::debug!(url, "no review score found");
                ReviewScore::Unrated
            }
        };

        let has_extended_info = document.select(&s.faq_heading).next().is_some();

        let address = first_text(&document, &s.address).filter(|a| !a.is_empty());

        let multiple_events_per_day = self.multiple_events(&document, url);

        let read_more: Vec<String> = document.select(&s.read_more).map(node_text).collect();
        let location_type = match_location(&read_more, &self.text.location_phrases);

        DetailFields {
            title,
            price,
            guests,
            review_score,
            has_extended_info,
            address,
            multiple_events_per_day,
            location_type,
        }
    }

    /// Finds the multiple-events question and reads its paired answer block.
    fn multiple_events(&self, document: &Html, url: &str) -> Option<bool> {
        let question = self.text.multiple_events_question.as_str();
        let Some(index) = document
            .select(&self.selectors.faq_question)
            .position(|q| node_text(q) == question)
        else {
            tracing::warn!(url, "no multiple-events-per-day info found");
            return None;
        };

        let Some(answer) = document.select(&self.selectors.faq_answer).nth(index) else {
            tracing::warn!(url, index, "multiple-events question has no answer block");
            return None;
        };

        Some(parse_answer(&node_text(answer), &self.text))
    }
}

fn node_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(node_text)
}

/// Parses a whole number, accepting `.` as a thousands separator.
///
/// With separators, the leading group holds one to three digits and every
/// later group exactly three, so `"1.200"` is 1200 but `"95.50"` is `None`.
fn parse_count(token: &str) -> Option<i64> {
    let token = token.trim();
    let mut groups = token.split('.');
    let lead = groups.next()?;
    let all_digits = |g: &str| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(lead) {
        return None;
    }
    if token.contains('.') && (lead.len() > 3 || !groups.all(|g| g.len() == 3 && all_digits(g))) {
        return None;
    }
    token.replace('.', "").parse().ok()
}

/// `"120€"` -> `120`. Anything that is not an integer once the currency
/// symbol is stripped yields `None`.
pub(crate) fn parse_price(text: &str, currency_symbol: &str) -> Option<i64> {
    parse_count(&text.replace(currency_symbol, ""))
}

/// Parses the guest capacity phrasing.
///
/// Patterns are tried in a fixed order: up-to marker, range separator, from
/// marker. The first pattern whose marker occurs in `text` decides the
/// result; its numbers failing to parse yields `None` rather than falling
/// through to the next pattern.
pub(crate) fn parse_guests(text: &str, rules: &TextRules) -> Option<GuestRange> {
    if let Some((_, rest)) = text.split_once(rules.guests_up_to.as_str()) {
        let max = parse_count(rest.split_whitespace().next()?)?;
        return Some(GuestRange::up_to(max));
    }

    if let Some((left, right)) = text.split_once(rules.guests_range_separator.as_str()) {
        let min = parse_count(left.split_whitespace().last()?)?;
        let max = parse_count(right.split_whitespace().next()?)?;
        return GuestRange::between(min, max);
    }

    if let Some((_, rest)) = text.split_once(rules.guests_from.as_str()) {
        let min = parse_count(rest.split_whitespace().next()?)?;
        return Some(GuestRange::at_least(min));
    }

    None
}

/// Parses a review score, accepting a decimal comma.
pub(crate) fn parse_review_score(text: &str) -> Option<f64> {
    let score: f64 = text.trim().replace(',', ".").parse().ok()?;
    score.is_finite().then_some(score)
}

/// Reads a yes/no FAQ answer with all whitespace removed.
///
/// The affirmative token wins over the negative one; neither present reads as
/// `false`.
pub(crate) fn parse_answer(text: &str, rules: &TextRules) -> bool {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.contains(rules.affirmative.as_str()) {
        return true;
    }
    if !compact.contains(rules.negative.as_str()) {
        tracing::debug!(answer = %text, "answer has neither token, reading as negative");
    }
    false
}

/// First read-more block containing one of `phrases` decides the type.
pub(crate) fn match_location(
    blocks: &[String],
    phrases: &[(String, LocationType)],
) -> Option<LocationType> {
    blocks.iter().find_map(|block| {
        phrases
            .iter()
            .find(|(phrase, _)| block.contains(phrase.as_str()))
            .map(|(_, location)| *location)
    })
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
