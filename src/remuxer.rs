use anyhow::{Result, anyhow};
use log::{error, debug};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use crate::extractor::truncate_diagnostics;

// @module: External muxer invocation for track insertion

/// Wrapper around the external muxer that inserts a subtitle file into a
/// container as a new, labeled, default-flagged track. All original tracks
/// are carried over unchanged.
pub struct Remuxer {
    mkvmerge_bin: String,
    track_language: String,
    track_name: String,
    timeout: Duration,
}

impl Remuxer {
    /// Create a remuxer for the given muxer binary, track labels, and timeout
    pub fn new(mkvmerge_bin: &str, track_language: &str, track_name: &str, timeout_secs: u64) -> Self {
        Self {
            mkvmerge_bin: mkvmerge_bin.to_string(),
            track_language: track_language.to_string(),
            track_name: track_name.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Merge `subtitle_path` into `video_path` as the new default subtitle
    /// track, writing the result to `output_path`. Success requires a zero
    /// exit status and an existing output file.
    pub async fn remux<P: AsRef<Path>>(
        &self,
        video_path: P,
        subtitle_path: P,
        output_path: P,
    ) -> Result<()> {
        let video_path = video_path.as_ref();
        let subtitle_path = subtitle_path.as_ref();
        let output_path = output_path.as_ref();

        if !subtitle_path.exists() {
            return Err(anyhow!("Subtitle file does not exist: {:?}", subtitle_path));
        }

        debug!(
            "Remuxing {:?} with sign track {:?} -> {:?}",
            video_path, subtitle_path, output_path
        );

        // The subtitle file comes first so its single track is track 0 of
        // that source, which the 0: selectors below address.
        let mkvmerge_future = Command::new(&self.mkvmerge_bin)
            .args([
                "-o", output_path.to_str().unwrap_or_default(),
                "--language", &format!("0:{}", self.track_language),
                "--track-name", &format!("0:{}", self.track_name),
                "--default-track", "0:yes",
                subtitle_path.to_str().unwrap_or_default(),
                video_path.to_str().unwrap_or_default(),
            ])
            .output();

        let result = tokio::select! {
            result = mkvmerge_future => {
                result.map_err(|e| anyhow!("Failed to execute {} for remux: {}", self.mkvmerge_bin, e))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(anyhow!("{} timed out after {} seconds", self.mkvmerge_bin, self.timeout.as_secs()));
            }
        };

        if !result.status.success() {
            // mkvmerge reports its errors on stdout
            let stdout = String::from_utf8_lossy(&result.stdout);
            let stderr = String::from_utf8_lossy(&result.stderr);
            let combined = truncate_diagnostics(&format!("{}{}", stdout, stderr));
            error!("Remux failed: {}", combined);
            return Err(anyhow!("{} remux failed: {}", self.mkvmerge_bin, combined));
        }

        if !output_path.exists() {
            return Err(anyhow!(
                "Muxer reported success but produced no output: {:?}",
                output_path
            ));
        }

        Ok(())
    }
}
