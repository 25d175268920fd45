//! CLI argument parsing for Revivir

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the trace summary
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text block (default)
    Text,
    /// JSON document for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "revivir")]
#[command(version)]
#[command(about = "Memory allocation trace analyzer and bounded replay synthesizer", long_about = None)]
pub struct Cli {
    /// Trace event log to analyze (delimiter and header names auto-detected)
    pub trace: PathBuf,

    /// Directory of smaps snapshots to fold into the report
    #[arg(long = "smaps", value_name = "DIR")]
    pub smaps: Option<PathBuf>,

    /// Summary output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Also write the summary as a JSON document
    #[arg(long = "summary-json", value_name = "PATH")]
    pub summary_json: Option<PathBuf>,

    /// Write the per-thread allocation timeline as CSV
    #[arg(long = "timeline-csv", value_name = "PATH")]
    pub timeline_csv: Option<PathBuf>,

    /// Write the cumulative net-byte curve as CSV
    #[arg(long = "curve-csv", value_name = "PATH")]
    pub curve_csv: Option<PathBuf>,

    /// Synthesize a bounded replay program at this path
    #[arg(long = "replay-out", value_name = "PATH")]
    pub replay_out: Option<PathBuf>,

    /// Maximum objects the replay may allocate
    #[arg(long = "max-objects", value_name = "N", default_value = "5000")]
    pub max_objects: usize,

    /// Per-object size cap for the replay, in bytes
    #[arg(
        long = "max-object-bytes",
        value_name = "BYTES",
        default_value = "16777216"
    )]
    pub max_object_bytes: u64,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
