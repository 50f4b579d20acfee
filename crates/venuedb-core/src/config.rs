use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_LISTING_URL: &str = "https://www.bodas.net/busc.php?id_grupo=1&id_provincia=3035";
pub const DEFAULT_ELASTIC_URL: &str = "http://localhost:9200";
pub const DEFAULT_ELASTIC_INDEX: &str = "venues";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "venuedb/0.1 (venue-ingest)";

/// Load run configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load run configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build run configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment is valid.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let non_empty = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "value is empty".to_string(),
            });
        }
        Ok(trimmed.to_string())
    };

    let listing_url = non_empty("VENUEDB_LISTING_URL", DEFAULT_LISTING_URL)?;
    let elastic_url = non_empty("VENUEDB_ELASTIC_URL", DEFAULT_ELASTIC_URL)?;
    let elastic_index = non_empty("VENUEDB_ELASTIC_INDEX", DEFAULT_ELASTIC_INDEX)?;
    let geocoder_url = non_empty("VENUEDB_GEOCODER_URL", DEFAULT_GEOCODER_URL)?;
    let log_level = or_default("VENUEDB_LOG_LEVEL", "info");
    let export_path = PathBuf::from(or_default("VENUEDB_EXPORT_PATH", "data.csv"));
    let user_agent = or_default("VENUEDB_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = parse_u64("VENUEDB_REQUEST_TIMEOUT_SECS", "5")?;
    let max_retries = parse_u32("VENUEDB_MAX_RETRIES", "0")?;
    let retry_backoff_base_secs = parse_u64("VENUEDB_RETRY_BACKOFF_BASE_SECS", "2")?;

    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VENUEDB_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }

    Ok(AppConfig {
        listing_url,
        elastic_url,
        elastic_index,
        geocoder_url,
        log_level,
        export_path,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
