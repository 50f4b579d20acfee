use std::path::PathBuf;

/// Run configuration shared by the scraper, the store and the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listing search URL; the page index is appended as `&NumPage=<n>`.
    pub listing_url: String,
    pub elastic_url: String,
    pub elastic_index: String,
    pub geocoder_url: String,
    pub log_level: String,
    pub export_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
