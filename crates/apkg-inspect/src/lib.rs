//! Command-line inspector for asset package archives.
//!
//! This crate is the presentation layer over `apkg-formats`: it renders the
//! header and index table and extracts single payloads by position. All
//! parsing and bounds checking lives in `apkg-formats`.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use commands::run;
pub use config::{Command, InspectConfig, LogLevel, OutputFormat, ValidationMode};
pub use error::ConfigError;
