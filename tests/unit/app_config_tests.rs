/*!
 * Tests for application configuration
 */

use signmux::app_config::{Config, LogLevel};

/// Defaults match the documented contract
#[test]
fn test_default_config_shouldCarryDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.max_input_size_bytes, 4 * 1024 * 1024 * 1024);
    assert_eq!(config.default_language, "Jpn");
    assert_eq!(config.output_extension, "mkv");
    assert_eq!(config.tools.track_language, "eng");
    assert_eq!(config.tools.track_name, "SignSub");
    assert_eq!(config.tools.extraction_timeout_secs, 300);
    assert_eq!(config.tools.remux_timeout_secs, 600);
    assert_eq!(config.cache.ttl_secs, 3600);
    assert!(!config.enrichment.enabled);
    assert_eq!(config.concurrent_jobs, 2);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// The default configuration validates
#[test]
fn test_validate_withDefaultConfig_shouldSucceed() {
    assert!(Config::default().validate().is_ok());
}

/// A zero size limit is rejected
#[test]
fn test_validate_withZeroSizeLimit_shouldFail() {
    let mut config = Config::default();
    config.max_input_size_bytes = 0;
    assert!(config.validate().is_err());
}

/// Zero concurrency is rejected
#[test]
fn test_validate_withZeroJobs_shouldFail() {
    let mut config = Config::default();
    config.concurrent_jobs = 0;
    assert!(config.validate().is_err());
}

/// A zero tool timeout is rejected
#[test]
fn test_validate_withZeroTimeout_shouldFail() {
    let mut config = Config::default();
    config.tools.extraction_timeout_secs = 0;
    assert!(config.validate().is_err());
}

/// Enabled enrichment requires an endpoint
#[test]
fn test_validate_withEnrichmentAndNoEndpoint_shouldFail() {
    let mut config = Config::default();
    config.enrichment.enabled = true;
    config.enrichment.endpoint = String::new();
    assert!(config.validate().is_err());
}

/// A sparse JSON document fills in every default
#[test]
fn test_deserialize_withEmptyJson_shouldApplyFieldDefaults() {
    let config: Config = serde_json::from_str("{}").unwrap();

    assert_eq!(config.tools.ffmpeg_bin, "ffmpeg");
    assert_eq!(config.tools.mkvmerge_bin, "mkvmerge");
    assert_eq!(config.enrichment.endpoint, "https://api.jikan.moe/v4");
    assert!(config.validate().is_ok());
}

/// Serialization round-trips the configuration
#[test]
fn test_serialize_thenDeserialize_shouldRoundTrip() {
    let mut config = Config::default();
    config.tools.track_name = "Overlay".to_string();
    config.log_level = LogLevel::Debug;

    let json = serde_json::to_string(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.tools.track_name, "Overlay");
    assert_eq!(parsed.log_level, LogLevel::Debug);
}

/// Partial JSON overrides only the named fields
#[test]
fn test_deserialize_withPartialJson_shouldOverrideOnlyNamedFields() {
    let config: Config =
        serde_json::from_str(r#"{"tools": {"remux_timeout_secs": 900}, "concurrent_jobs": 4}"#)
            .unwrap();

    assert_eq!(config.tools.remux_timeout_secs, 900);
    assert_eq!(config.concurrent_jobs, 4);
    // Sibling fields keep their defaults
    assert_eq!(config.tools.extraction_timeout_secs, 300);
    assert_eq!(config.max_input_size_bytes, 4 * 1024 * 1024 * 1024);
}
