use std::collections::HashMap;
use std::env::VarError;
use std::path::Path;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.listing_url, DEFAULT_LISTING_URL);
    assert_eq!(cfg.elastic_url, "http://localhost:9200");
    assert_eq!(cfg.elastic_index, "venues");
    assert_eq!(cfg.geocoder_url, "https://nominatim.openstreetmap.org");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.export_path, Path::new("data.csv"));
    assert_eq!(cfg.request_timeout_secs, 5);
    assert_eq!(cfg.user_agent, "venuedb/0.1 (venue-ingest)");
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.retry_backoff_base_secs, 2);
}

#[test]
fn build_app_config_applies_overrides() {
    let mut map = HashMap::new();
    map.insert("VENUEDB_ELASTIC_URL", "http://es.internal:9200");
    map.insert("VENUEDB_ELASTIC_INDEX", "wedding-venues");
    map.insert("VENUEDB_EXPORT_PATH", "/tmp/venues.csv");
    map.insert("VENUEDB_MAX_RETRIES", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.elastic_url, "http://es.internal:9200");
    assert_eq!(cfg.elastic_index, "wedding-venues");
    assert_eq!(cfg.export_path, Path::new("/tmp/venues.csv"));
    assert_eq!(cfg.max_retries, 3);
}

#[test]
fn build_app_config_trims_urls() {
    let mut map = HashMap::new();
    map.insert("VENUEDB_LISTING_URL", "  https://listing.example/search?q=1 ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.listing_url, "https://listing.example/search?q=1");
}

#[test]
fn build_app_config_rejects_blank_index() {
    let mut map = HashMap::new();
    map.insert("VENUEDB_ELASTIC_INDEX", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VENUEDB_ELASTIC_INDEX"),
        "expected InvalidEnvVar(VENUEDB_ELASTIC_INDEX), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("VENUEDB_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VENUEDB_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(VENUEDB_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_timeout() {
    let mut map = HashMap::new();
    map.insert("VENUEDB_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VENUEDB_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(VENUEDB_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_max_retries() {
    let mut map = HashMap::new();
    map.insert("VENUEDB_MAX_RETRIES", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VENUEDB_MAX_RETRIES"),
        "expected InvalidEnvVar(VENUEDB_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_backoff() {
    let mut map = HashMap::new();
    map.insert("VENUEDB_RETRY_BACKOFF_BASE_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "VENUEDB_RETRY_BACKOFF_BASE_SECS"),
        "expected InvalidEnvVar(VENUEDB_RETRY_BACKOFF_BASE_SECS), got: {result:?}"
    );
}
