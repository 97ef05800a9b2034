//! fsweave - reconstruct file operations from recorded file events.
//!
//! Usage:
//!   weave detect EVENTS      Detect operations in an event log (JSON array or JSON lines)
//!   weave classify PATH...   Show how paths are classified (backup / temp)
//!   weave config             Print the default detector configuration
//!   weave --help             Show help

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use tracing_subscriber::{EnvFilter, fmt};

use fsweave_core::{DetectorConfig, FileOperation, load_events};
use fsweave_detect::{NameClassifier, PatternDetector};

#[derive(Parser)]
#[command(
    name = "fsweave",
    version,
    about = "Reconstruct file operations from recorded file events",
    long_about = "fsweave reads a recorded list of filesystem events and reports the \
                  higher-level operations behind them: rename chains, batch updates \
                  and backup-then-save sequences."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Detector configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect operations in an event log
    Detect {
        /// Event log (JSON array or JSON lines)
        events: PathBuf,

        /// Only report the first match of each heuristic
        #[arg(long)]
        first: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show how paths are classified
    Classify {
        /// Paths to classify
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print the detector configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => DetectorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DetectorConfig::default(),
    };

    match cli.command {
        Command::Detect {
            events,
            first,
            format,
        } => run_detect(config, &events, first, format)?,
        Command::Classify { paths } => run_classify(config, &paths)?,
        Command::Config => print!("{}", config.to_toml_string()?),
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` overrides `-v`.
fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| eyre!("Failed to install log subscriber: {err}"))
}

/// Run detection over an event log and print the results.
fn run_detect(
    config: DetectorConfig,
    events_path: &Path,
    first_only: bool,
    format: OutputFormat,
) -> Result<()> {
    let events = load_events(events_path)
        .with_context(|| format!("Failed to read events from {}", events_path.display()))?;
    let detector = PatternDetector::from_config(config).context("Invalid name patterns")?;

    tracing::info!(events = events.len(), path = %events_path.display(), "loaded event log");

    let operations: Vec<FileOperation> = if first_only {
        [
            detector.detect_rename_sequence(&events),
            detector.detect_batch_update(&events),
            detector.detect_backup_create(&events),
        ]
        .into_iter()
        .flatten()
        .collect()
    } else {
        detector.detect_all(&events)
    };

    match format {
        OutputFormat::Text => print_operations(&operations, events.len()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&operations)?),
    }

    Ok(())
}

/// Print classification of each path.
fn run_classify(config: DetectorConfig, paths: &[PathBuf]) -> Result<()> {
    let detector = PatternDetector::from_config(config).context("Invalid name patterns")?;
    let classifier = detector.classifier();

    for path in paths {
        let label = match (classifier.is_backup_file(path), classifier.is_temp_file(path)) {
            (true, true) => "backup, temp",
            (true, false) => "backup",
            (false, true) => "temp",
            (false, false) => "-",
        };
        println!("{:<14} {}", label, path.display());
    }

    Ok(())
}

fn print_operations(operations: &[FileOperation], event_count: usize) {
    println!();
    println!("{}", "─".repeat(70));
    println!(
        " {} operation(s) detected in {} event(s)",
        operations.len(),
        event_count
    );
    println!("{}", "─".repeat(70));
    println!();

    for (i, op) in operations.iter().enumerate() {
        let flags = [
            (op.is_atomic, "atomic"),
            (op.is_safe, "safe"),
            (op.has_backup, "backup"),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, name)| *name)
        .collect::<Vec<_>>()
        .join(", ");

        println!(
            " {}. {} ({:.0}% confidence, {})",
            i + 1,
            op.operation_type,
            op.confidence * 100.0,
            flags
        );
        println!("    {}", op.description);
        println!(
            "    {} .. {} ({} ms, {} events)",
            op.start_time.format("%H:%M:%S%.3f"),
            op.end_time.format("%H:%M:%S%.3f"),
            op.duration().num_milliseconds(),
            op.event_count()
        );
        for path in &op.files_affected {
            println!("      {}", path.display());
        }
        println!();
    }
}
