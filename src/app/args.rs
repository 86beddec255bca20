//! Command line arguments for the flowqueue harness

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Drive a queue pool with synthetic traffic and report its statistics
#[derive(Parser, Debug, Clone)]
#[command(name = "flowqueue", version)]
pub struct Args {
    /// Configuration file path (defaults to <config dir>/flowqueue/flowqueue.toml)
    #[arg(long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Queue capacity, overriding the configuration file
    #[arg(long = "size", value_name = "N")]
    pub size: Option<usize>,

    /// Number of producer threads feeding the inbox queue
    #[arg(long = "producers", value_name = "N", default_value_t = 2)]
    pub producers: usize,

    /// Items each producer puts
    #[arg(long = "items", value_name = "N", default_value_t = 1000)]
    pub items: u64,

    /// Simulated processing time per item in the consumer
    #[arg(long = "consumer-delay-us", value_name = "MICROS", default_value_t = 0)]
    pub consumer_delay_us: u64,

    /// Interval between statistics reports while running
    #[arg(long = "report-interval-ms", value_name = "MILLIS", default_value_t = 1000)]
    pub report_interval_ms: u64,

    /// Leave the inbox in fall-through mode so every item is dropped
    #[arg(long = "fall-through", action = ArgAction::SetTrue)]
    pub fall_through: bool,

    /// Format of the final statistics report
    #[arg(long = "output", value_name = "FORMAT", value_parser = ["text", "json"], default_value = "text")]
    pub output: String,

    /// Verbose output (can be used multiple times for more verbosity)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (can be used multiple times for less verbosity)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Disable colored output
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    pub no_color: bool,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "json"])]
    pub log_format: Option<String>,

    /// Log level (overrides -v/-q)
    #[arg(long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Log level from `--log-level`, or derived from -v/-q counts
    pub fn effective_log_level(&self) -> &str {
        if let Some(level) = self.log_level.as_deref() {
            return level;
        }
        match self.verbose as i16 - self.quiet as i16 {
            i16::MIN..=-2 => "error",
            -1 => "warn",
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
