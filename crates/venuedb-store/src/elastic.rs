//! Elasticsearch REST client for the venue index.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use venuedb_core::AppConfig;

use crate::error::StoreError;

/// Index lifecycle and document operations the ingestion gate needs.
///
/// [`ElasticClient`] is the production implementation; tests drive the gate
/// with an in-memory one.
pub trait DocumentSink {
    /// Deletes `index`. Returns `false` when there was no such index.
    fn delete_index(&self, index: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn index_exists(&self, index: &str) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Creates `index` with `mappings`. Returns `false` when it already existed.
    fn create_index(
        &self,
        index: &str,
        mappings: &Value,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Counts documents whose `field` equals `value` exactly.
    fn count_matching(
        &self,
        index: &str,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Writes one document and returns its id. With `id = None` the sink
    /// assigns one.
    fn write_document(
        &self,
        index: &str,
        document: &Value,
        id: Option<&str>,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Makes every prior write visible to counts.
    fn refresh_index(&self, index: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn count_all(&self, index: &str) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// Elasticsearch HTTP client.
///
/// One instance is built per run and passed to the gate explicitly.
pub struct ElasticClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Deserialize)]
struct WriteResponse {
    #[serde(rename = "_id")]
    id: String,
}

impl ElasticClient {
    /// Creates a client for the cluster at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidUrl`] if `base_url` does not parse, or
    /// [`StoreError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, StoreError> {
        Url::parse(base_url).map_err(|e| StoreError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Builds a client from the sink settings in `config`.
    ///
    /// # Errors
    ///
    /// See [`ElasticClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        Self::new(&config.elastic_url, config.request_timeout_secs)
    }

    fn url(&self, index: &str, endpoint: Option<&str>) -> String {
        match endpoint {
            Some(endpoint) => format!("{}/{index}/{endpoint}", self.base_url),
            None => format!("{}/{index}", self.base_url),
        }
    }

    async fn ensure_success(response: Response, url: &str) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
            body,
        })
    }

    async fn read_count(response: Response, url: &str) -> Result<u64, StoreError> {
        let response = Self::ensure_success(response, url).await?;
        let body = response.text().await?;
        let parsed: CountResponse = serde_json::from_str(&body).map_err(|e| StoreError::Json {
            context: format!("count response from {url}"),
            source: e,
        })?;
        Ok(parsed.count)
    }
}

/// `true` when an error body names the given Elasticsearch exception type.
fn is_error_type(body: &str, error_type: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["type"].as_str().map(|t| t == error_type))
        .unwrap_or(false)
}

impl DocumentSink for ElasticClient {
    async fn delete_index(&self, index: &str) -> Result<bool, StoreError> {
        let url = self.url(index, None);
        let response = self.client.delete(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(index, "delete-index on absent index");
            return Ok(false);
        }
        Self::ensure_success(response, &url).await?;
        Ok(true)
    }

    async fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        let url = self.url(index, None);
        let response = self.client.head(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Self::ensure_success(response, &url).await.map(|_| true),
        }
    }

    async fn create_index(&self, index: &str, mappings: &Value) -> Result<bool, StoreError> {
        let url = self.url(index, None);
        let response = self.client.put(&url).json(mappings).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST
            && is_error_type(&body, "resource_already_exists_exception")
        {
            tracing::debug!(index, "index already exists");
            return Ok(false);
        }
        Err(StoreError::UnexpectedStatus {
            status: status.as_u16(),
            url,
            body,
        })
    }

    async fn count_matching(
        &self,
        index: &str,
        field: &str,
        value: &str,
    ) -> Result<u64, StoreError> {
        let url = self.url(index, Some("_count"));
        let mut term = serde_json::Map::new();
        term.insert(field.to_owned(), Value::from(value));
        let query = json!({ "query": { "term": term } });
        let response = self.client.post(&url).json(&query).send().await?;
        Self::read_count(response, &url).await
    }

    async fn write_document(
        &self,
        index: &str,
        document: &Value,
        id: Option<&str>,
    ) -> Result<String, StoreError> {
        let (url, request) = match id {
            Some(id) => {
                let url = self.url(index, Some(&format!("_doc/{id}")));
                let request = self.client.put(&url);
                (url, request)
            }
            None => {
                let url = self.url(index, Some("_doc"));
                let request = self.client.post(&url);
                (url, request)
            }
        };
        let response = request.json(document).send().await?;
        let response = Self::ensure_success(response, &url).await?;

        let body = response.text().await?;
        let parsed: WriteResponse = serde_json::from_str(&body).map_err(|e| StoreError::Json {
            context: format!("write response from {url}"),
            source: e,
        })?;
        Ok(parsed.id)
    }

    async fn refresh_index(&self, index: &str) -> Result<(), StoreError> {
        let url = self.url(index, Some("_refresh"));
        let response = self.client.post(&url).send().await?;
        Self::ensure_success(response, &url).await?;
        Ok(())
    }

    async fn count_all(&self, index: &str) -> Result<u64, StoreError> {
        let url = self.url(index, Some("_count"));
        let response = self.client.get(&url).send().await?;
        Self::read_count(response, &url).await
    }
}
