//! Index table parsing and validation
//!
//! The index table starts right after the header and holds `entry_count`
//! fixed-size records:
//! ```text
//! offset 0x00: u64 id              (caller-defined asset identifier)
//! offset 0x08: u32 relative_start  (payload offset relative to data_start)
//! offset 0x0C: u32 size            (payload length in bytes)
//! ```
//! Record order on disk is the addressing order; positions are never re-sorted.

use crate::constants::ENTRY_SIZE;
use crate::error::{ArchiveError, ArchiveResult};
use crate::header::ArchiveHeader;
use crate::stream::remaining_len;
use binrw::{BinRead, BinWrite};
use std::io::{Read, Seek};
use std::ops::Range;
use tracing::{debug, warn};

/// One index record describing a payload in the data region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, BinRead, BinWrite)]
#[brw(little)]
pub struct IndexEntry {
    /// Asset identifier, not guaranteed unique
    pub id: u64,
    /// Payload offset relative to the data region
    pub relative_start: u32,
    /// Payload size in bytes
    pub size: u32,
}

impl IndexEntry {
    /// Create new index entry
    pub fn new(id: u64, relative_start: u32, size: u32) -> Self {
        Self {
            id,
            relative_start,
            size,
        }
    }

    /// Offset one past the payload, relative to the data region
    pub fn relative_end(&self) -> u64 {
        u64::from(self.relative_start) + u64::from(self.size)
    }

    /// Absolute byte range of the payload within the archive
    pub fn absolute_range(&self, data_start: u32) -> Range<u64> {
        let start = u64::from(data_start) + u64::from(self.relative_start);
        start..start + u64::from(self.size)
    }

    /// Check whether the payload fits inside a data region of `data_len` bytes
    pub fn fits_within(&self, data_len: u64) -> bool {
        self.relative_end() <= data_len
    }
}

/// When entry ranges are checked against the data region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Validation {
    /// Reject the archive at open time if any entry overruns the data region
    #[default]
    Eager,
    /// Defer range problems to retrieval, where they surface as truncation
    Lazy,
}

/// Read `header.entry_count` records from the current stream position
///
/// The stream must be positioned immediately after the header. The table
/// length is checked against the bytes remaining before anything is
/// allocated, so a corrupt count cannot trigger a huge allocation.
pub fn parse_index<R: Read + Seek>(
    reader: &mut R,
    header: &ArchiveHeader,
) -> ArchiveResult<Vec<IndexEntry>> {
    let expected = header.index_table_len();
    let available = remaining_len(reader)?;
    if available < expected {
        return Err(ArchiveError::TruncatedInput {
            context: "index table",
            expected,
            available,
        });
    }

    let count = header.entry_count as usize;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        entries.push(IndexEntry::read(reader)?);
    }

    debug!(
        "Parsed {} index entries ({} bytes)",
        entries.len(),
        entries.len() * ENTRY_SIZE
    );
    Ok(entries)
}

/// Check every entry against a data region of `data_len` bytes
///
/// Fails on the first entry, in position order, whose range ends past the
/// data region.
pub fn validate_entries(entries: &[IndexEntry], data_len: u64) -> ArchiveResult<()> {
    for (position, entry) in entries.iter().enumerate() {
        if !entry.fits_within(data_len) {
            warn!(
                "Index entry {} (id {}) overruns data region: {}+{} > {}",
                position, entry.id, entry.relative_start, entry.size, data_len
            );
            return Err(ArchiveError::CorruptIndexEntry {
                position,
                id: entry.id,
                relative_start: entry.relative_start,
                size: entry.size,
                data_len,
            });
        }
    }
    Ok(())
}
