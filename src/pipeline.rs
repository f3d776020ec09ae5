use anyhow::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::app_config::Config;
use crate::artifact_cache::{ArtifactStore, cache_key};
use crate::enrichment::Enricher;
use crate::errors::PipelineError;
use crate::extractor::SubtitleExtractor;
use crate::file_utils::FileManager;
use crate::filename_builder::build_output_name;
use crate::metadata;
use crate::remuxer::Remuxer;
use crate::sign_classifier;

// @module: Pipeline orchestration for one input container

/// Outcome of one pipeline run. `output_path` is None on any failure;
/// `display_name` is always populated, falling back to the original name.
#[derive(Debug)]
pub struct PipelineResult {
    /// Location of the produced container, when the run succeeded
    pub output_path: Option<PathBuf>,

    /// Name the result should be presented under
    pub display_name: String,

    /// The stage failure that aborted the run, when it failed
    pub failure: Option<PipelineError>,
}

impl PipelineResult {
    fn success(output_path: PathBuf, display_name: String) -> Self {
        Self {
            output_path: Some(output_path),
            display_name,
            failure: None,
        }
    }

    fn failed(display_name: String, failure: PipelineError) -> Self {
        Self {
            output_path: None,
            display_name,
            failure: Some(failure),
        }
    }

    /// Whether the run produced an output container
    pub fn is_success(&self) -> bool {
        self.output_path.is_some()
    }
}

/// Orchestrates extraction, classification, and remux for input containers,
/// registering produced artifacts in the injected store.
pub struct Pipeline {
    config: Config,
    extractor: SubtitleExtractor,
    remuxer: Remuxer,
    store: Arc<dyn ArtifactStore>,
    enricher: Option<Arc<dyn Enricher>>,
}

impl Pipeline {
    /// Create a pipeline over the given configuration and artifact store
    pub fn new(config: Config, store: Arc<dyn ArtifactStore>) -> Self {
        let extractor = SubtitleExtractor::new(
            &config.tools.ffmpeg_bin,
            config.tools.extraction_timeout_secs,
        );
        let remuxer = Remuxer::new(
            &config.tools.mkvmerge_bin,
            &config.tools.track_language,
            &config.tools.track_name,
            config.tools.remux_timeout_secs,
        );

        Self {
            config,
            extractor,
            remuxer,
            store,
            enricher: None,
        }
    }

    /// Attach an optional metadata enricher
    pub fn with_enricher(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Process one container end to end. Never panics or returns an error
    /// across this boundary: every failure is folded into the result, and a
    /// successful run is registered in the artifact store under the key
    /// derived from `identifier` before the result is returned.
    pub async fn process_file(
        &self,
        input: &Path,
        original_name: &str,
        identifier: &str,
    ) -> PipelineResult {
        // Metadata failure is not fatal: fall back to the original name and
        // still attempt the pipeline, keying temp files off that name.
        let display_name = match metadata::parse_filename(
            original_name,
            &self.config.default_language,
            &self.config.output_extension,
        ) {
            Ok(meta) => {
                self.enrich(&meta.title).await;
                build_output_name(&meta)
            }
            Err(e) => {
                warn!("Metadata parse failed for '{}': {}", original_name, e);
                original_name.to_string()
            }
        };

        match self.run_stages(input, original_name, &display_name).await {
            Ok(output_path) => {
                let key = cache_key(identifier);
                self.store.put(&key, output_path.clone(), &display_name);
                info!("Produced '{}' (cache key {})", display_name, key);
                PipelineResult::success(output_path, display_name)
            }
            Err(failure) => {
                error!(
                    "Pipeline aborted at {} stage for '{}': {}",
                    failure.stage(),
                    original_name,
                    failure
                );
                PipelineResult::failed(display_name, failure)
            }
        }
    }

    /// Run the stages in order, returning at the first failure. Intermediate
    /// files live in a run-scoped temp directory that is removed when the
    /// guard drops, on every exit path including cancellation.
    async fn run_stages(
        &self,
        input: &Path,
        original_name: &str,
        display_name: &str,
    ) -> Result<PathBuf, PipelineError> {
        let size = FileManager::file_size(input)
            .map_err(|e| PipelineError::Extraction(e.to_string()))?;
        if size > self.config.max_input_size_bytes {
            return Err(PipelineError::InputTooLarge {
                size,
                limit: self.config.max_input_size_bytes,
            });
        }

        let run_key = cache_key(original_name);
        let workdir = tempfile::Builder::new()
            .prefix(&format!("signmux-{}-", run_key))
            .tempdir()
            .map_err(|e| PipelineError::Extraction(format!("Failed to create temp dir: {}", e)))?;

        let extracted = workdir.path().join("extracted.ass");
        let signs = workdir.path().join("signs.ass");

        self.extractor
            .extract(input, &extracted)
            .await
            .map_err(|e| PipelineError::Extraction(e.to_string()))?;

        let stats = sign_classifier::classify_file(&extracted, &signs)
            .map_err(|e| PipelineError::Classification(e.to_string()))?;
        debug!(
            "'{}': {} sign events kept, {} dialogue dropped, {} malformed",
            original_name, stats.kept, stats.dropped, stats.malformed
        );

        // The output must outlive the workdir, so it goes to the system temp
        // dir under a collision-free name. The artifact store owns it from
        // registration until consumption or eviction.
        let output_path = std::env::temp_dir().join(format!(
            "{}-{}",
            Uuid::new_v4().simple(),
            display_name
        ));

        let remux_result = self.remuxer.remux(input, &signs, &output_path).await;
        if let Err(e) = remux_result {
            // Never leave a partial container behind
            FileManager::remove_file_quiet(&output_path);
            return Err(PipelineError::Remux(e.to_string()));
        }

        Ok(output_path)
    }

    /// Best-effort remote lookup; logged, never load-bearing
    async fn enrich(&self, title: &str) {
        let Some(enricher) = &self.enricher else {
            return;
        };

        match enricher.lookup(title).await {
            Ok(Some(info)) => info!("Matched series '{}' in remote catalog", info.title),
            Ok(None) => debug!("No remote catalog match for '{}'", title),
            Err(e) => debug!("Enrichment lookup failed for '{}': {}", title, e),
        }
    }

    /// Process every video file under a directory, at most
    /// `concurrent_jobs` at a time. One slow file never stalls the others;
    /// runs are fully independent. Each result is paired with its source
    /// path, which doubles as the cache identifier.
    pub async fn process_folder(&self, dir: &Path) -> Result<Vec<(PathBuf, PipelineResult)>> {
        let files = FileManager::find_video_files(dir)?;
        if files.is_empty() {
            warn!("No video files found under {:?}", dir);
            return Ok(Vec::new());
        }

        info!("Processing {} file(s) under {:?}", files.len(), dir);

        let progress = ProgressBar::new(files.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let results: Vec<(PathBuf, PipelineResult)> = stream::iter(files)
            .map(|file| {
                let progress = progress.clone();
                async move {
                    let original_name = file
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    let identifier = file.to_string_lossy().to_string();
                    let result = self.process_file(&file, &original_name, &identifier).await;
                    progress.inc(1);
                    (file, result)
                }
            })
            .buffer_unordered(self.config.concurrent_jobs)
            .collect()
            .await;

        progress.finish_and_clear();

        let succeeded = results.iter().filter(|(_, r)| r.is_success()).count();
        info!("Finished folder run: {}/{} succeeded", succeeded, results.len());

        Ok(results)
    }

    /// The artifact store this pipeline registers results in
    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }
}
