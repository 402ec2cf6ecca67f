//! Asset package header parsing
//!
//! Layout (little-endian, 12 bytes):
//! ```text
//! offset 0x00: u32 version      (packed (major << 16) | (minor << 8) | patch)
//! offset 0x04: u32 entry_count  (number of 16-byte index records that follow)
//! offset 0x08: u32 data_start   (absolute offset of the data region)
//! ```

use crate::constants::{ENTRY_SIZE, HEADER_SIZE};
use crate::error::{ArchiveError, ArchiveResult};
use crate::stream::remaining_len;
use binrw::{BinRead, BinWrite};
use std::fmt;
use std::io::{Read, Seek};
use tracing::debug;

/// Asset package file header
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct ArchiveHeader {
    /// Packed format version, see [`FormatVersion`]
    pub version: u32,

    /// Number of index entries following the header
    pub entry_count: u32,

    /// Absolute offset of the data region
    pub data_start: u32,
}

impl ArchiveHeader {
    /// Create a header with the given fields
    pub fn new(version: u32, entry_count: u32, data_start: u32) -> Self {
        Self {
            version,
            entry_count,
            data_start,
        }
    }

    /// Read the header from the current stream position
    ///
    /// Consumes exactly [`HEADER_SIZE`] bytes on success. A short stream is
    /// reported as `TruncatedInput` without moving the cursor.
    pub fn parse<R: Read + Seek>(reader: &mut R) -> ArchiveResult<Self> {
        let available = remaining_len(reader)?;
        if available < HEADER_SIZE as u64 {
            return Err(ArchiveError::TruncatedInput {
                context: "header",
                expected: HEADER_SIZE as u64,
                available,
            });
        }

        let header = Self::read(reader)?;
        debug!(
            "Parsed asset package header: version={}, entries={}, data_start={}",
            header.format_version(),
            header.entry_count,
            header.data_start
        );
        Ok(header)
    }

    /// Decoded view of the packed version
    pub fn format_version(&self) -> FormatVersion {
        FormatVersion::from_packed(self.version)
    }

    /// Absolute offset one past the last index record
    pub fn index_table_end(&self) -> u64 {
        HEADER_SIZE as u64 + u64::from(self.entry_count) * ENTRY_SIZE as u64
    }

    /// Byte length of the index table
    pub fn index_table_len(&self) -> u64 {
        u64::from(self.entry_count) * ENTRY_SIZE as u64
    }

    /// Check that the index table and data region do not overlap
    pub fn validate_layout(&self) -> ArchiveResult<()> {
        let index_end = self.index_table_end();
        if u64::from(self.data_start) < index_end {
            return Err(ArchiveError::InvalidHeader {
                reason: format!(
                    "data region starts at {} but index table of {} entries ends at {}",
                    self.data_start, self.entry_count, index_end
                ),
            });
        }
        Ok(())
    }
}

/// Semantic version packed into the header's `version` field
///
/// The top 8 bits of the packed value are reserved and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion {
    /// Major component (bits 16..24)
    pub major: u8,
    /// Minor component (bits 8..16)
    pub minor: u8,
    /// Patch component (bits 0..8)
    pub patch: u8,
}

impl FormatVersion {
    /// Create a version from its components
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Decode a packed version
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            major: ((packed >> 16) & 0xFF) as u8,
            minor: ((packed >> 8) & 0xFF) as u8,
            patch: (packed & 0xFF) as u8,
        }
    }

    /// Encode into the packed on-disk representation
    pub const fn packed(self) -> u32 {
        ((self.major as u32) << 16) | ((self.minor as u32) << 8) | self.patch as u32
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl From<u32> for FormatVersion {
    fn from(packed: u32) -> Self {
        Self::from_packed(packed)
    }
}
