//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

pub const DEFAULT_CONFIG_PATH: &str = "etc/lidminder.toml";

#[derive(Parser, Debug)]
#[command(name = "lidminder", version, about = "Lid presence timer")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Write logs to daily-rotated files in this directory instead of stderr
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the timer until interrupted
    Run {
        /// Stop after this many ticks (useful with the simulated backend)
        #[arg(long, value_name = "N")]
        max_ticks: Option<u64>,
        /// Override pause between ticks in ms; 0 = free-run
        #[arg(long, value_name = "MS")]
        poll_ms: Option<u64>,
        /// Cycle the indicator through its colors before starting
        #[arg(long, action = ArgAction::SetTrue)]
        post: bool,
        /// Start the simulated lid in the raised position (no effect with
        /// the hardware backend)
        #[arg(long, action = ArgAction::SetTrue)]
        start_raised: bool,
    },
    /// Power-on self test: cycle the indicator colors, then off
    Selftest,
}
