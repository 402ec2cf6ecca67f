//! Error types for asset package operations

use thiserror::Error;

/// Asset package operation result type
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors raised while opening or reading an asset package
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The stream ended before the expected number of bytes was available
    #[error("truncated {context}: expected {expected} bytes, only {available} available")]
    TruncatedInput {
        /// Which part of the archive was being read
        context: &'static str,
        /// Number of bytes required
        expected: u64,
        /// Number of bytes the stream actually had left
        available: u64,
    },

    /// An index entry claims a range outside the data region
    #[error(
        "corrupt index entry at position {position} (id {id}): range {relative_start}+{size} exceeds data region of {data_len} bytes"
    )]
    CorruptIndexEntry {
        /// Position of the entry in the index table
        position: usize,
        /// Identifier stored in the entry
        id: u64,
        /// Declared start relative to the data region
        relative_start: u32,
        /// Declared payload size
        size: u32,
        /// Actual length of the data region
        data_len: u64,
    },

    /// Caller asked for a position outside `[0, count)`
    #[error("position {position} out of range: archive has {count} entries")]
    IndexOutOfRange {
        /// Requested position
        position: usize,
        /// Number of entries in the archive
        count: usize,
    },

    /// Header fields describe an impossible layout
    #[error("invalid header: {reason}")]
    InvalidHeader {
        /// Detailed description of the problem
        reason: String,
    },

    /// Binary decoding error
    #[error("binary format error: {0}")]
    BinRead(#[from] binrw::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    /// Check if the archive ended early
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. })
    }

    /// Check if the archive contents are structurally invalid
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::TruncatedInput { .. }
                | Self::CorruptIndexEntry { .. }
                | Self::InvalidHeader { .. }
        )
    }

    /// Check if the error was caused by the caller rather than the archive
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }
}
