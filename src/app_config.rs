use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Maximum accepted input container size in bytes
    #[serde(default = "default_max_input_size_bytes")]
    pub max_input_size_bytes: u64,

    /// Fallback language token for output names when the filename carries none
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Container extension for produced output files
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// External tool settings (decoder and muxer)
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Artifact cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Optional remote metadata enrichment settings
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Maximum number of files processed concurrently in folder mode
    #[serde(default = "default_concurrent_jobs")]
    pub concurrent_jobs: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the external decoder and muxer invocations
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolsConfig {
    /// Decoder binary name or path
    #[serde(default = "default_ffmpeg_bin")]
    pub ffmpeg_bin: String,

    /// Muxer binary name or path
    #[serde(default = "default_mkvmerge_bin")]
    pub mkvmerge_bin: String,

    /// Subtitle extraction timeout in seconds
    #[serde(default = "default_extraction_timeout_secs")]
    pub extraction_timeout_secs: u64,

    /// Remux timeout in seconds
    #[serde(default = "default_remux_timeout_secs")]
    pub remux_timeout_secs: u64,

    /// Language tag applied to the inserted subtitle track
    #[serde(default = "default_track_language")]
    pub track_language: String,

    /// Display name applied to the inserted subtitle track
    #[serde(default = "default_track_name")]
    pub track_name: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: default_ffmpeg_bin(),
            mkvmerge_bin: default_mkvmerge_bin(),
            extraction_timeout_secs: default_extraction_timeout_secs(),
            remux_timeout_secs: default_remux_timeout_secs(),
            track_language: default_track_language(),
            track_name: default_track_name(),
        }
    }
}

/// Settings for the in-memory artifact cache
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds; entries older than this are treated
    /// as consumed and their backing file is removed on the next access
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Settings for the optional remote metadata lookup
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnrichmentConfig {
    /// Whether to attempt remote lookups at all
    #[serde(default)]
    pub enabled: bool,

    /// Service endpoint URL
    #[serde(default = "default_enrichment_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_enrichment_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_enrichment_endpoint(),
            timeout_secs: default_enrichment_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_max_input_size_bytes() -> u64 {
    4 * 1024 * 1024 * 1024 // 4 GiB
}

fn default_language() -> String {
    "Jpn".to_string()
}

fn default_output_extension() -> String {
    "mkv".to_string()
}

fn default_ffmpeg_bin() -> String {
    "ffmpeg".to_string()
}

fn default_mkvmerge_bin() -> String {
    "mkvmerge".to_string()
}

fn default_extraction_timeout_secs() -> u64 {
    300 // 5 minutes; extraction touches only the subtitle stream
}

fn default_remux_timeout_secs() -> u64 {
    600 // 10 minutes; remux rewrites the whole container
}

fn default_track_language() -> String {
    "eng".to_string()
}

fn default_track_name() -> String {
    "SignSub".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_enrichment_endpoint() -> String {
    "https://api.jikan.moe/v4".to_string()
}

fn default_enrichment_timeout_secs() -> u64 {
    10
}

fn default_concurrent_jobs() -> usize {
    2
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.max_input_size_bytes == 0 {
            return Err(anyhow!("max_input_size_bytes must be greater than zero"));
        }

        if self.concurrent_jobs == 0 {
            return Err(anyhow!("concurrent_jobs must be greater than zero"));
        }

        if self.tools.extraction_timeout_secs == 0 || self.tools.remux_timeout_secs == 0 {
            return Err(anyhow!("tool timeouts must be greater than zero"));
        }

        if self.tools.track_language.is_empty() {
            return Err(anyhow!("tools.track_language must not be empty"));
        }

        if self.enrichment.enabled && self.enrichment.endpoint.is_empty() {
            return Err(anyhow!("enrichment.endpoint is required when enrichment is enabled"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            max_input_size_bytes: default_max_input_size_bytes(),
            default_language: default_language(),
            output_extension: default_output_extension(),
            tools: ToolsConfig::default(),
            cache: CacheConfig::default(),
            enrichment: EnrichmentConfig::default(),
            concurrent_jobs: default_concurrent_jobs(),
            log_level: LogLevel::default(),
        }
    }
}
