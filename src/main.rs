// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use crate::artifact_cache::{ArtifactStore, InMemoryArtifactStore, cache_key};
use crate::enrichment::JikanClient;
use crate::file_utils::FileManager;
use crate::pipeline::{Pipeline, PipelineResult};

mod app_config;
mod artifact_cache;
mod enrichment;
mod errors;
mod extractor;
mod file_utils;
mod filename_builder;
mod metadata;
mod pipeline;
mod remuxer;
mod sign_classifier;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract sign subtitles and remux them as the default track (default command)
    #[command(alias = "process")]
    Process(ProcessArgs),

    /// Generate shell completions for signmux
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ProcessArgs {
    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Directory the produced container is delivered to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Attempt remote catalog enrichment of parsed titles
    #[arg(short, long)]
    enrich: bool,
}

/// signmux - Sign-Subtitle Extraction and Remux
///
/// Pulls the embedded subtitle track out of a video container, keeps only the
/// events that render on-screen signage, and remuxes them back as a new
/// default-flagged subtitle track under a canonical output name.
#[derive(Parser, Debug)]
#[command(name = "signmux")]
#[command(version = "1.0.0")]
#[command(about = "Sign-subtitle extraction and remux tool")]
#[command(long_about = "signmux extracts the first subtitle stream of a video container, isolates the
sign/overlay events, and remuxes them as a new default subtitle track.

EXAMPLES:
    signmux episode.mkv                        # Process one file, deliver next to it
    signmux -o out/ episode.mkv                # Deliver into out/
    signmux /anime/season-2/                   # Process a whole directory
    signmux --enrich episode.mkv               # Also look the title up remotely
    signmux --log-level debug episode.mkv      # Verbose logging
    signmux completions bash > signmux.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

EXTERNAL TOOLS:
    ffmpeg     - subtitle stream extraction (must be on PATH)
    mkvmerge   - container remux (must be on PATH)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input video file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Directory the produced container is delivered to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Attempt remote catalog enrichment of parsed titles
    #[arg(short, long)]
    enrich: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "signmux", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Process(args)) => run_process(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let process_args = ProcessArgs {
                input_path,
                output_dir: cli.output_dir,
                config_path: cli.config_path,
                log_level: cli.log_level,
                enrich: cli.enrich,
            };
            run_process(process_args).await
        }
    }
}

async fn run_process(options: ProcessArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(to_level_filter(&cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        if options.enrich {
            config.enrichment.enabled = true;
        }

        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();
        config.enrichment.enabled = options.enrich;

        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    let store = Arc::new(InMemoryArtifactStore::new(config.cache.ttl_secs));
    let mut pipeline = Pipeline::new(config.clone(), store.clone());

    if config.enrichment.enabled {
        let enricher = JikanClient::new(&config.enrichment)
            .context("Failed to initialize enrichment client")?;
        pipeline = pipeline.with_enricher(Arc::new(enricher));
    }

    if options.input_path.is_file() {
        let original_name = options
            .input_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let identifier = options.input_path.to_string_lossy().to_string();
        let output_dir = options
            .output_dir
            .clone()
            .or_else(|| options.input_path.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        let result = pipeline
            .process_file(&options.input_path, &original_name, &identifier)
            .await;
        deliver_result(&store, &result, &identifier, &output_dir)?;

        if !result.is_success() {
            return Err(anyhow!("Processing failed for {:?}", options.input_path));
        }
    } else if options.input_path.is_dir() {
        let results = pipeline.process_folder(&options.input_path).await?;

        let output_dir = options
            .output_dir
            .clone()
            .unwrap_or_else(|| options.input_path.clone());
        for (source, result) in &results {
            // Folder runs key artifacts by source path
            let identifier = source.to_string_lossy().to_string();
            deliver_result(&store, result, &identifier, &output_dir)?;
        }

        // Anything still cached at this point is stale
        let evicted = store.evict_expired();
        if evicted > 0 {
            warn!("Evicted {} stale artifact(s)", evicted);
        }

        let failed = results.iter().filter(|(_, r)| !r.is_success()).count();
        if failed > 0 {
            return Err(anyhow!("{} file(s) failed to process", failed));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

/// Take the produced artifact out of the store and move it into the delivery
/// directory under its display name. The take is single-shot; once delivered
/// the cache holds nothing for this run.
fn deliver_result(
    store: &Arc<InMemoryArtifactStore>,
    result: &PipelineResult,
    identifier: &str,
    output_dir: &Path,
) -> Result<()> {
    if !result.is_success() {
        error!("Failed to produce '{}'", result.display_name);
        return Ok(());
    }

    let key = cache_key(identifier);
    let entry = match store.take(&key) {
        Ok(entry) => entry,
        Err(e) => {
            // Not an internal error: the artifact is simply not available
            warn!("Artifact not retrievable for '{}': {}", result.display_name, e);
            return Ok(());
        }
    };

    FileManager::ensure_dir(output_dir)?;
    let target = output_dir.join(&entry.display_name);
    move_file(&entry.path, &target)?;
    info!("Delivered {:?}", target);

    Ok(())
}

/// Rename, falling back to copy+remove across filesystem boundaries
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;
    FileManager::remove_file_quiet(from);
    Ok(())
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
