use anyhow::{Result, anyhow};
use log::{error, debug};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

// @module: External decoder invocation for subtitle extraction

// @const: Upper bound on retained diagnostic output
const MAX_STDERR_LEN: usize = 2000;

/// Wrapper around the external decoder that pulls the first subtitle stream
/// of a container into a standalone ASS file.
pub struct SubtitleExtractor {
    ffmpeg_bin: String,
    timeout: Duration,
}

impl SubtitleExtractor {
    /// Create an extractor for the given decoder binary and timeout
    pub fn new(ffmpeg_bin: &str, timeout_secs: u64) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Extract the first subtitle stream of `video_path` to `output_path` as
    /// an ASS document. Success requires a zero exit status and an existing
    /// output file; a timeout is reported as a failure, not a crash.
    pub async fn extract<P: AsRef<Path>>(&self, video_path: P, output_path: P) -> Result<()> {
        let video_path = video_path.as_ref();
        let output_path = output_path.as_ref();

        if !video_path.exists() {
            return Err(anyhow!("Video file does not exist: {:?}", video_path));
        }

        debug!("Extracting first subtitle stream from {:?}", video_path);

        let ffmpeg_future = Command::new(&self.ffmpeg_bin)
            .args([
                "-y",                       // Overwrite existing file
                "-i", video_path.to_str().unwrap_or_default(),
                "-map", "0:s:0",            // First subtitle stream only
                "-c:s", "ass",              // ASS output format
                output_path.to_str().unwrap_or_default(),
            ])
            .output();

        let result = tokio::select! {
            result = ffmpeg_future => {
                result.map_err(|e| anyhow!("Failed to execute {} for subtitle extraction: {}", self.ffmpeg_bin, e))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(anyhow!("{} timed out after {} seconds", self.ffmpeg_bin, self.timeout.as_secs()));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let filtered = truncate_diagnostics(&filter_ffmpeg_stderr(&stderr));
            error!("Subtitle extraction failed: {}", filtered);
            return Err(anyhow!("{} extraction failed: {}", self.ffmpeg_bin, filtered));
        }

        if !output_path.exists() {
            return Err(anyhow!(
                "Decoder reported success but produced no output: {:?}",
                output_path
            ));
        }

        Ok(())
    }
}

/// Filter decoder stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Chapter",
        "    Chapter",
        "  Stream #",
        "      Metadata:",
        "        title",
        "        BPS",
        "        DURATION",
        "        NUMBER_OF",
        "        _STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            if line.trim().is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown decoder error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}

/// Bound diagnostic text so a chatty tool cannot balloon the logs
pub(crate) fn truncate_diagnostics(text: &str) -> String {
    if text.len() <= MAX_STDERR_LEN {
        return text.to_string();
    }

    let mut end = MAX_STDERR_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
