//! Reader for indexed asset package archives (`.apkg.bin`)
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::doc_markdown)] // Format field names don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::uninlined_format_args)] // Consistent logging style
//! An asset package bundles many identified binary blobs into one file:
//!
//! ```text
//! +----------------------+  offset 0
//! | header (12 bytes)    |  version, entry_count, data_start
//! +----------------------+  offset 12
//! | index table          |  entry_count x 16-byte records
//! +----------------------+  offset data_start
//! | data region          |  payloads, addressed by relative_start/size
//! +----------------------+
//! ```
//!
//! All integers are little-endian. Entries are addressed by their position in
//! the index table; identifiers are carried along but never used as keys.
//!
//! # Usage
//!
//! ```rust
//! use apkg_formats::ArchiveIndex;
//! use std::io::Cursor;
//!
//! let mut bytes = Vec::new();
//! bytes.extend_from_slice(&1u32.to_le_bytes()); // version 0.0.1
//! bytes.extend_from_slice(&1u32.to_le_bytes()); // one entry
//! bytes.extend_from_slice(&28u32.to_le_bytes()); // data starts after the index
//! bytes.extend_from_slice(&42u64.to_le_bytes()); // id
//! bytes.extend_from_slice(&0u32.to_le_bytes()); // relative start
//! bytes.extend_from_slice(&5u32.to_le_bytes()); // size
//! bytes.extend_from_slice(b"hello");
//!
//! let mut archive = ArchiveIndex::from_reader(Cursor::new(bytes))?;
//! assert_eq!(archive.entries()[0].id, 42);
//! assert_eq!(archive.read_entry(0)?, b"hello");
//! # Ok::<(), apkg_formats::ArchiveError>(())
//! ```

#![warn(missing_docs)]

mod error;
pub mod header;
pub mod index;
pub mod reader;
mod stream;

pub use error::{ArchiveError, ArchiveResult};
pub use header::{ArchiveHeader, FormatVersion};
pub use index::{IndexEntry, Validation, parse_index, validate_entries};
pub use reader::{ArchiveIndex, ArchiveOptions};

/// Asset package format constants
pub mod constants {
    use crate::header::FormatVersion;

    /// Size of the file header in bytes
    pub const HEADER_SIZE: usize = 12;

    /// Size of each index record in bytes
    pub const ENTRY_SIZE: usize = 16;

    /// Version written by the reference bundler
    pub const BUNDLER_VERSION: FormatVersion = FormatVersion::new(0, 1, 0);

    /// Conventional file extension for bundled archives
    pub const ARCHIVE_EXTENSION: &str = "apkg.bin";
}
