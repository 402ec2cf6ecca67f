//! Output formatting for archive summaries
//!
//! Tables use rounded Unicode borders; JSON output uses the serializable
//! summary types below so both formats carry the same fields.

use apkg_formats::{ArchiveHeader, IndexEntry};
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets};
use serde::Serialize;

/// Header fields plus the decoded version string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderSummary {
    /// Decoded `major.minor.patch`
    pub version: String,
    /// Raw packed version
    pub version_packed: u32,
    /// Number of index entries
    pub entry_count: u32,
    /// Absolute offset of the data region
    pub data_start: u32,
}

impl From<&ArchiveHeader> for HeaderSummary {
    fn from(header: &ArchiveHeader) -> Self {
        Self {
            version: header.format_version().to_string(),
            version_packed: header.version,
            entry_count: header.entry_count,
            data_start: header.data_start,
        }
    }
}

/// One index entry with its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    /// Zero-based position in the index table
    pub position: usize,
    /// Asset identifier
    pub id: u64,
    /// Payload offset relative to the data region
    pub start: u32,
    /// Payload size in bytes
    pub size: u32,
}

impl EntryRow {
    /// Build a row for the entry at `position`
    pub fn new(position: usize, entry: &IndexEntry) -> Self {
        Self {
            position,
            id: entry.id,
            start: entry.relative_start,
            size: entry.size,
        }
    }
}

/// Collect rows for every entry in order
pub fn entry_rows(entries: &[IndexEntry]) -> Vec<EntryRow> {
    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| EntryRow::new(position, entry))
        .collect()
}

/// Extracted payload in JSON form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadSummary {
    /// Entry the payload belongs to
    #[serde(flatten)]
    pub entry: EntryRow,
    /// Payload bytes, hex encoded
    pub data: String,
}

impl PayloadSummary {
    /// Summarize the payload read for `entry`
    pub fn new(entry: EntryRow, data: &[u8]) -> Self {
        Self {
            entry,
            data: hex::encode(data),
        }
    }
}

/// Create a table with rounded borders
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render the header as a two-column key/value table
pub fn header_table(summary: &HeaderSummary) -> Table {
    let mut table = create_table();
    table.add_row(vec![Cell::new("File Version"), Cell::new(&summary.version)]);
    table.add_row(vec![
        Cell::new("Asset Index Count"),
        Cell::new(summary.entry_count),
    ]);
    table.add_row(vec![
        Cell::new("Data Start Position"),
        Cell::new(summary.data_start),
    ]);
    table
}

/// Render entry rows with an Index/ID/Start/Size header
pub fn entries_table(rows: &[EntryRow]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Index", "ID", "Start", "Size"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.position).set_alignment(CellAlignment::Right),
            Cell::new(row.id).set_alignment(CellAlignment::Right),
            Cell::new(row.start).set_alignment(CellAlignment::Right),
            Cell::new(row.size).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
