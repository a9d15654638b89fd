// SPDX-License-Identifier: MIT
//
// Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use gapvi_buffer::MIN_BUFFER_SIZE;
use tracing_subscriber::filter::LevelFilter;

/// A minimal modal terminal editor built on a gap buffer.
#[derive(Debug, Parser)]
#[command(name = "gapvi", version, about)]
pub struct Args {
    /// File to load as the initial text.
    pub file: Option<PathBuf>,

    /// Initial capacity in bytes for an empty buffer. Raised to the minimum
    /// if smaller.
    #[arg(long, value_name = "N", default_value_t = MIN_BUFFER_SIZE)]
    pub capacity: usize,

    /// Write logs to this file. Logging is off without it.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Most verbose level written to the log file.
    #[arg(long, value_name = "LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("gapvi").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = parse(&[]);
        assert_eq!(args.file, None);
        assert_eq!(args.capacity, MIN_BUFFER_SIZE);
        assert_eq!(args.log_file, None);
        assert_eq!(args.log_level, LogLevel::Info);
    }

    #[test]
    fn all_options() {
        let args = parse(&[
            "notes.txt",
            "--capacity",
            "4096",
            "--log-file",
            "/tmp/gapvi.log",
            "--log-level",
            "trace",
        ]);
        assert_eq!(args.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(args.capacity, 4096);
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/gapvi.log")));
        assert_eq!(args.log_level, LogLevel::Trace);
    }

    #[test]
    fn bad_level_is_rejected() {
        assert!(Args::try_parse_from(["gapvi", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn level_maps_to_filter() {
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
        assert_eq!(LevelFilter::from(LogLevel::Debug), LevelFilter::DEBUG);
    }
}
