//! Address to coordinates resolution.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use venuedb_core::{AppConfig, Coordinates};

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

/// Resolves a free-text address to a point.
///
/// `Ok(None)` means the service answered but knows no such place.
pub trait Geocoder {
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Option<Coordinates>, ScraperError>> + Send;
}

/// Client for a Nominatim-compatible `/search` endpoint.
///
/// Built from [`AppConfig`] with [`NominatimClient::from_config`], or against
/// any base URL (a self-hosted instance, a mock server in tests) with
/// [`NominatimClient::with_base_url`].
pub struct NominatimClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

/// Nominatim serialises coordinates as strings; some mirrors use numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Text(String),
    Number(f64),
}

impl Degrees {
    fn value(&self) -> Option<f64> {
        match self {
            Self::Text(s) => s.trim().parse().ok(),
            Self::Number(n) => Some(*n),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: Degrees,
    lon: Degrees,
}

impl NominatimClient {
    /// Creates a client against a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::InvalidUrl`] if `base_url`
    /// is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join("search")` appends to the path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            max_retries: 0,
            backoff_base_secs: 0,
        })
    }

    /// Builds a client from the geocoder and request settings in `config`.
    ///
    /// # Errors
    ///
    /// See [`NominatimClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Ok(Self::with_base_url(
            &config.geocoder_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retries(config.max_retries, config.retry_backoff_base_secs))
    }

    /// Sets the retry policy for transient failures.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_secs: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_secs = backoff_base_secs;
        self
    }

    fn search_url(&self, address: &str) -> Result<Url, ScraperError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| ScraperError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        Ok(url)
    }

    async fn search_once(&self, url: &Url) -> Result<Vec<Place>, ScraperError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ScraperError::RateLimited {
                url: url.to_string(),
                retry_after_secs,
            });
        }
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("geocoder search {url}"),
            source: e,
        })
    }
}

impl Geocoder for NominatimClient {
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] / [`ScraperError::UnexpectedStatus`]
    ///   for non-2xx answers.
    /// - [`ScraperError::Http`] on network failure or timeout.
    /// - [`ScraperError::Deserialize`] if the body is not a list of places.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, ScraperError> {
        let url = self.search_url(address)?;
        let places = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.search_once(&url)
        })
        .await?;

        let Some(place) = places.first() else {
            tracing::debug!(address, "geocoder found no match");
            return Ok(None);
        };
        match (place.lat.value(), place.lon.value()) {
            (Some(lat), Some(lon)) => Ok(Some(Coordinates { lat, lon })),
            _ => {
                tracing::warn!(address, "geocoder returned unparseable coordinates");
                Ok(None)
            }
        }
    }
}
