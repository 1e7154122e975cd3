//! Command-line arguments for the simulation binary

use clap::Parser;
use std::path::PathBuf;

/// Bounded, priority-ordered, self-expiring notification queue simulation
///
/// Runs a set of worker tasks pushing and popping against one shared queue
/// while the analyzer reports on it whenever the queue fills up or its
/// periodic interval elapses.
#[derive(Parser, Debug, Default)]
#[command(name = "notiq", version, about)]
pub struct Args {
    /// TOML configuration file; command-line flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fixed queue capacity
    #[arg(long, value_name = "N")]
    pub capacity: Option<usize>,

    /// Number of mixed push/pop worker tasks
    #[arg(long, value_name = "N")]
    pub mixed_workers: Option<usize>,

    /// Number of pop-only drainer tasks
    #[arg(long, value_name = "N")]
    pub drainers: Option<usize>,

    /// Total run duration in seconds
    #[arg(long, value_name = "SECONDS")]
    pub run_for_secs: Option<u64>,

    /// Periodic analyzer wake interval in seconds
    #[arg(long, value_name = "SECONDS")]
    pub analyzer_interval_secs: Option<u64>,

    /// Analysis report file (defaults to a timestamped name in the
    /// working directory)
    #[arg(long, value_name = "FILE")]
    pub report_file: Option<PathBuf>,

    /// Emit reports as JSON instead of text
    #[arg(long)]
    pub report_json: bool,

    /// Log level spec (e.g. "info", "debug", "notiq=trace")
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log line format: "text" or "ext"
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Log file (defaults to stderr)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}
