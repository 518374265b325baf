//! CLI argument parsing for schedline

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for thread transitions
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "schedline")]
#[command(version)]
#[command(
    about = "Translate scheduler tracepoints into per-thread transitions",
    long_about = None
)]
pub struct Cli {
    /// Trace to load: one JSON-encoded event per line
    #[arg(value_name = "TRACE")]
    pub trace: PathBuf,

    /// Loader configuration file (TOML)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Trace only has sched_switch events; bridge gaps with synthetic transitions
    #[arg(long = "switch-only")]
    pub switch_only: bool,

    /// Abort on the first malformed event instead of skipping it
    #[arg(long = "strict")]
    pub strict: bool,

    /// Number of worker shards
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Show only the load summary instead of individual transitions
    #[arg(short = 'c', long = "summary")]
    pub summary: bool,

    /// Enable debug tracing output (to stderr)
    #[arg(long = "debug")]
    pub debug: bool,
}
