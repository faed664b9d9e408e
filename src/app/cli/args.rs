//! Command-line arguments
//!
//! Every option can also come from the TOML configuration file; values given
//! here win over the file.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "teamscan")]
#[command(about = "QR attendance scanner: submits scanned team IDs to an attendance endpoint")]
#[command(version, long_version = crate::core::version::long_version())]
#[command(
    after_help = "Scanned payloads are read one per line. On stdin, an empty line resets the \
                  scanner after a result and ':q' quits. With --source, stdin takes only \
                  commands and also accepts 'q' or 'quit'."
)]
pub struct Args {
    /// Attendance endpoint URL (http or https)
    #[arg(short = 'e', long = "endpoint", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Event title shown above the scanner panel
    #[arg(short = 't', long = "title", value_name = "TEXT")]
    pub title: Option<String>,

    /// Read decoded payloads from a file or FIFO instead of stdin
    #[arg(short = 's', long = "source", value_name = "PATH")]
    pub source: Option<PathBuf>,

    /// Give up on a submission after this many seconds
    #[arg(long = "request-timeout", value_name = "SECS")]
    pub request_timeout: Option<u64>,

    /// Return to scanning automatically this many seconds after a result
    #[arg(long = "auto-reset", value_name = "SECS")]
    pub auto_reset: Option<u64>,

    /// Force colored output (overrides TTY detection and NO_COLOR)
    #[arg(long = "color", action = ArgAction::SetTrue)]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", action = ArgAction::SetTrue, conflicts_with = "color")]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,
}

impl Args {
    /// `Some(true)` for --color, `Some(false)` for --no-color, `None` for auto.
    pub fn color_choice(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
