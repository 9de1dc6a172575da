//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "weigh", version, about = "Scale weigh-in CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/weigh_config.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a captured advertisement log through the weigh-in pipeline
    Replay {
        /// Capture CSV with columns offset_ms,local_name,data (hex)
        #[arg(value_name = "FILE")]
        capture: PathBuf,
        /// Stop after this many recorded weigh-ins
        #[arg(long, value_name = "N")]
        settle_limit: Option<usize>,
        /// Print session counters when the replay ends
        #[arg(long, action = ArgAction::SetTrue)]
        stats: bool,
    },
    /// Decode a single manufacturer-data blob given as hex
    Decode {
        /// Raw manufacturer data, hex encoded (company id first)
        #[arg(value_name = "HEX")]
        blob: String,
        /// Advertised local name, if any
        #[arg(long, value_name = "NAME")]
        local_name: Option<String>,
    },
    /// Quick health check of the decode and settle pipeline
    SelfCheck,
}
