mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "darkux-guard")]
#[command(about = "Heuristic dark-pattern detection for web pages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a page snapshot, a directory of snapshots, or a URL
    Scan {
        /// .html/.json snapshot, directory of snapshots, or URL
        target: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        detectors: DetectorArgs,

        /// Exit with status 1 when any page scores below this
        #[arg(long)]
        min_score: Option<u8>,

        /// Suppress banner and summary
        #[arg(short, long)]
        quiet: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Re-scan a target on a fixed interval until interrupted
    Monitor {
        /// .html/.json snapshot or URL
        target: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: StreamFormat,

        #[command(flatten)]
        detectors: DetectorArgs,

        /// Milliseconds between scans (overrides the config file)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Stop after this many reports
        #[arg(long)]
        count: Option<u64>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// List all available detectors
    List,
    /// Generate a default .darkux-guard.toml config file
    Init,
}

/// Detector selection shared by `scan` and `monitor`.
#[derive(clap::Args, Clone, Default)]
struct DetectorArgs {
    /// Enable these detectors (comma-separated keys)
    #[arg(short, long, value_delimiter = ',')]
    enable: Vec<String>,

    /// Disable these detectors (comma-separated keys)
    #[arg(short, long, value_delimiter = ',')]
    disable: Vec<String>,

    /// Path to config file (default: .darkux-guard.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
    Sarif,
}

#[derive(ValueEnum, Clone, Copy)]
enum StreamFormat {
    Text,
    Json,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("darkux_guard=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            target,
            format,
            detectors,
            min_score,
            quiet,
            no_color,
        } => commands::scan::run(&target, format, &detectors, min_score, quiet, no_color).await,
        Commands::Monitor {
            target,
            format,
            detectors,
            interval_ms,
            count,
            no_color,
        } => commands::monitor::run(&target, format, &detectors, interval_ms, count, no_color).await,
        Commands::List => commands::list::run(),
        Commands::Init => commands::init::run(),
    }
}
