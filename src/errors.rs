/*!
 * Error types for the signmux application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can abort a single pipeline run, one variant per stage
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The filename metadata parser could not tokenize the original name
    #[error("Metadata parse failed: {0}")]
    MetadataParse(String),

    /// The input container exceeds the configured maximum size
    #[error("Input too large: {size} bytes (limit {limit} bytes)")]
    InputTooLarge {
        /// Observed file size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// The external decoder exited non-zero or timed out
    #[error("Subtitle extraction failed: {0}")]
    Extraction(String),

    /// Reading, filtering, or writing the subtitle document failed
    #[error("Sign classification failed: {0}")]
    Classification(String),

    /// The external muxer exited non-zero or timed out
    #[error("Remux failed: {0}")]
    Remux(String),
}

impl PipelineError {
    /// Short stage label used in log lines and user-facing failure summaries
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MetadataParse(_) => "metadata",
            Self::InputTooLarge { .. } => "size-check",
            Self::Extraction(_) => "extraction",
            Self::Classification(_) => "classification",
            Self::Remux(_) => "remux",
        }
    }
}

/// Errors reported by the artifact cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// The key is absent, already consumed, or its backing file vanished
    #[error("Artifact not available: {0}")]
    Miss(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a pipeline stage
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Error from the artifact cache
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
