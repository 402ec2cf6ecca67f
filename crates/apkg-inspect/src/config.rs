//! Command-line configuration.
//!
//! Every global option can also be supplied through an environment variable
//! (`APKG_ARCHIVE`, `APKG_VALIDATION`, `APKG_FORMAT`, `APKG_LOG_LEVEL`).
//!
//! # Example
//!
//! ```no_run
//! use apkg_inspect::InspectConfig;
//!
//! let config = InspectConfig::from_args();
//! config.validate().expect("Invalid configuration");
//! println!("Inspecting: {}", config.archive.display());
//! ```

use crate::error::ConfigError;
use apkg_formats::constants::ARCHIVE_EXTENSION;
use apkg_formats::{ArchiveOptions, Validation};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

/// Inspector configuration loaded from CLI args and environment variables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "apkg-inspect",
    about = "Inspect the header, index and payloads of asset package archives",
    version
)]
pub struct InspectConfig {
    /// Path to the archive (`.apkg.bin`)
    #[arg(
        short,
        long,
        env = "APKG_ARCHIVE",
        global = true,
        default_value = "example.apkg.bin"
    )]
    pub archive: PathBuf,

    /// When entry ranges are checked against the data region
    #[arg(
        long,
        value_enum,
        env = "APKG_VALIDATION",
        global = true,
        default_value = "eager"
    )]
    pub validation: ValidationMode,

    /// Output format
    #[arg(
        short,
        long,
        value_enum,
        env = "APKG_FORMAT",
        global = true,
        default_value = "table"
    )]
    pub format: OutputFormat,

    /// Set the logging level
    #[arg(
        short,
        long,
        value_enum,
        env = "APKG_LOG_LEVEL",
        global = true,
        default_value = "warn"
    )]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

/// Inspector subcommands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the header fields and decoded version
    Info,

    /// List every index entry in on-disk order
    List,

    /// Write the payload of one entry
    Extract {
        /// Zero-based entry position
        position: usize,

        /// Write the payload to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show every position that carries an identifier
    Find {
        /// Asset identifier
        id: u64,
    },
}

/// Entry validation policy
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationMode {
    /// Reject archives whose entries overrun the data region at open time
    Eager,
    /// Report overruns only when the entry is extracted
    Lazy,
}

impl From<ValidationMode> for Validation {
    fn from(mode: ValidationMode) -> Self {
        match mode {
            ValidationMode::Eager => Validation::Eager,
            ValidationMode::Lazy => Validation::Lazy,
        }
    }
}

/// Output format options
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Rounded tables
    Table,
    /// JSON output
    Json,
}

/// Logging verbosity
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl InspectConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Archive open options derived from the configuration.
    #[must_use]
    pub fn archive_options(&self) -> ArchiveOptions {
        ArchiveOptions::new().with_validation(self.validation.into())
    }

    /// Check if the archive path carries the conventional extension.
    #[must_use]
    pub fn has_archive_extension(&self) -> bool {
        self.archive
            .to_str()
            .is_some_and(|path| path.ends_with(&format!(".{ARCHIVE_EXTENSION}")))
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the archive path does not exist or is not a file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.archive.exists() {
            return Err(ConfigError::MissingArchive(self.archive.clone()));
        }
        if !self.archive.is_file() {
            return Err(ConfigError::NotAFile(self.archive.clone()));
        }
        Ok(())
    }
}
