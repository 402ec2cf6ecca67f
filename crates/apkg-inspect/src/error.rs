//! Error types for the inspector.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Archive path does not exist
    #[error("archive not found: {}", .0.display())]
    MissingArchive(PathBuf),

    /// Archive path is a directory or other non-file
    #[error("archive path is not a file: {}", .0.display())]
    NotAFile(PathBuf),
}
