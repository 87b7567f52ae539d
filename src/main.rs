// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use littre_enrich::app_config::{self, Config};
use littre_enrich::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Enrich a parsed corpus (default command)
    Enrich(EnrichArgs),

    /// Generate shell completions for littre-enrich
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct EnrichArgs {
    /// Corpus shard (JSON array of entries) or directory of shards
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Calibration sampling seed
    #[arg(long)]
    seed: Option<u64>,

    /// Calibration sample size per (role, method) bucket
    #[arg(long)]
    sample_size: Option<usize>,
}

/// littre-enrich - semantic enrichment of the Littré sense trees
///
/// Classifies every sense fragment, extracts canonical phrase forms,
/// resolves the scope of grammatical transitions and writes a review worklist.
#[derive(Parser, Debug)]
#[command(name = "littre-enrich")]
#[command(version)]
#[command(about = "Semantic enrichment of parsed Littré entries")]
#[command(long_about = "littre-enrich reads parsed dictionary entries (JSON shards), enriches their sense trees and writes the enriched shards plus a review flag worklist.

EXAMPLES:
    littre-enrich corpus/                        # Enrich every shard in a directory
    littre-enrich -f corpus/a.json               # Force overwrite existing outputs
    littre-enrich -o out/ corpus/                # Write outputs to another directory
    littre-enrich --seed 7 --sample-size 10 corpus/
    littre-enrich completions bash > littre-enrich.bash

OUTPUTS:
    <stem>.enriched.json for every input shard, and review_flags.json with the
    flags of the whole corpus.

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Corpus shard (JSON array of entries) or directory of shards
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Calibration sampling seed
    #[arg(long)]
    seed: Option<u64>,

    /// Calibration sample size per (role, method) bucket
    #[arg(long)]
    sample_size: Option<usize>,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
    // The max level is raised or lowered once the config is read
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
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
    // The level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "littre-enrich", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Enrich(args)) => run_enrich(args).await,
        None => {
            // Default behavior - use top-level args
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let enrich_args = EnrichArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                log_level: cli.log_level,
                seed: cli.seed,
                sample_size: cli.sample_size,
            };
            run_enrich(enrich_args).await
        }
    }
}

async fn run_enrich(options: EnrichArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = options.log_level {
        let level: app_config::LogLevel = cmd_log_level.into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = Path::new(&options.config_path);
    let (mut config, created) = Config::load_or_create(config_path)?;
    if created {
        warn!("Config file not found at '{}', created default config.", options.config_path);
    }

    // Override config with CLI options if provided
    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    }
    if let Some(seed) = options.seed {
        config.enrichment.calibration_seed = seed;
    }
    if let Some(sample_size) = options.sample_size {
        config.enrichment.calibration_per_bucket = sample_size;
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let output_dir = match options.output_dir {
        Some(dir) => dir,
        None if options.input_path.is_dir() => options.input_path.clone(),
        None => options
            .input_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf(),
    };

    let controller = Controller::with_config(config)?.with_excluded_path(config_path);
    let summary = controller
        .run(options.input_path, output_dir, options.force_overwrite)
        .await?;

    if !summary.was_skipped() {
        info!(
            "Enriched {} entries in {} shard(s), {} review flag(s)",
            summary.report.entries,
            summary.shards,
            summary.total_flags()
        );
    }

    Ok(())
}
