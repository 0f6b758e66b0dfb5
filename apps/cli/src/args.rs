//! # CLI Argument Definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use cpool_logger::{LevelFilter, Logger, LoggerBuilder, Rotation};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "cipherpool")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Encrypt and decrypt values through a pool of pre-initialized AES engines")]
pub struct Cli {
    /// Settings file (TOML, JSON or YAML). Defaults to `cipherpool.*` in the working directory, if present
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs into rolling files under this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// How often log files roll over
    #[arg(long, global = true, value_enum, default_value_t = LogRotation::Daily, requires = "log_dir")]
    pub log_rotation: LogRotation,

    /// Number of rolled log files to keep
    #[arg(long, global = true, default_value_t = 7, requires = "log_dir")]
    pub log_keep: usize,

    /// Write log files as JSON lines
    #[arg(long, global = true, requires = "log_dir")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Logger configuration for these arguments. Console output goes to stderr so
    /// stdout carries only command results.
    #[must_use]
    pub fn logger(&self, name: &str) -> LoggerBuilder {
        let builder = Logger::builder(name).stderr(true).level(self.log_level());
        let Some(dir) = &self.log_dir else {
            return builder;
        };

        let builder =
            builder.file(dir).rotation(self.log_rotation.rotation()).max_files(self.log_keep);
        if self.log_json { builder.json() } else { builder }
    }
}

/// Log file rotation period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogRotation {
    Minutely,
    Hourly,
    Daily,
    Never,
}

impl LogRotation {
    #[must_use]
    pub const fn rotation(self) -> Rotation {
        match self {
            Self::Minutely => Rotation::MINUTELY,
            Self::Hourly => Rotation::HOURLY,
            Self::Daily => Rotation::DAILY,
            Self::Never => Rotation::NEVER,
        }
    }
}

/// Enumeration of available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Encrypt then decrypt each value, verify the result and print the ciphertext
    Roundtrip {
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Encrypt a value and print the base64 ciphertext
    Encrypt { value: String },
    /// Decrypt a base64 ciphertext and print the plaintext
    Decrypt { value: String },
    /// Issue many encrypt calls back to back and report how many found an engine
    Burst {
        #[arg(long, default_value_t = 20)]
        calls: usize,
    },
}
