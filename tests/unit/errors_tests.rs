/*!
 * Tests for error types
 */

use signmux::errors::{AppError, CacheError, PipelineError};

/// Each stage error renders its diagnostic text
#[test]
fn test_pipeline_error_display_shouldIncludeDetail() {
    let err = PipelineError::Extraction("ffmpeg exited with 1".to_string());
    assert_eq!(err.to_string(), "Subtitle extraction failed: ffmpeg exited with 1");

    let err = PipelineError::Remux("mkvmerge timed out".to_string());
    assert_eq!(err.to_string(), "Remux failed: mkvmerge timed out");
}

/// The size refusal carries both observed size and limit
#[test]
fn test_input_too_large_display_shouldIncludeSizes() {
    let err = PipelineError::InputTooLarge {
        size: 5_000_000_000,
        limit: 4_294_967_296,
    };
    let rendered = err.to_string();

    assert!(rendered.contains("5000000000"));
    assert!(rendered.contains("4294967296"));
}

/// Stage labels are stable identifiers for logs
#[test]
fn test_pipeline_error_stage_shouldNameStage() {
    assert_eq!(PipelineError::MetadataParse(String::new()).stage(), "metadata");
    assert_eq!(PipelineError::Extraction(String::new()).stage(), "extraction");
    assert_eq!(PipelineError::Classification(String::new()).stage(), "classification");
    assert_eq!(PipelineError::Remux(String::new()).stage(), "remux");
    assert_eq!(PipelineError::InputTooLarge { size: 1, limit: 0 }.stage(), "size-check");
}

/// A cache miss is reportable, not an internal fault
#[test]
fn test_cache_error_display_shouldNameKey() {
    let err = CacheError::Miss("a1b2c3d4".to_string());
    assert_eq!(err.to_string(), "Artifact not available: a1b2c3d4");
}

/// Stage and cache errors wrap into the application error
#[test]
fn test_app_error_from_shouldWrapSourceErrors() {
    let app: AppError = PipelineError::Classification("boom".to_string()).into();
    assert!(app.to_string().contains("Sign classification failed: boom"));

    let app: AppError = CacheError::Miss("k".to_string()).into();
    assert!(app.to_string().contains("Artifact not available"));
}

/// IO errors convert into file errors
#[test]
fn test_app_error_from_io_shouldBecomeFileError() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let app: AppError = io.into();
    assert!(matches!(app, AppError::File(_)));
}
