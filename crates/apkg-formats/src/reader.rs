//! Opened asset package with random-access retrieval
//!
//! An [`ArchiveIndex`] is built in two phases: the header and index table are
//! parsed once at open time, after which payloads are fetched by position.
//! Every retrieval repositions the underlying cursor, so `read_entry` takes
//! `&mut self`; callers that need parallel reads open one `ArchiveIndex` per
//! thread over independent handles.

use crate::error::{ArchiveError, ArchiveResult};
use crate::header::ArchiveHeader;
use crate::index::{IndexEntry, Validation, parse_index, validate_entries};
use crate::stream::{remaining_len, stream_len};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info, trace};

/// Options controlling how an archive is opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Entry range validation policy
    pub validation: Validation,
}

impl ArchiveOptions {
    /// Options with eager validation
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validation policy
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }
}

/// Parsed asset package bound to its underlying stream
#[derive(Debug)]
pub struct ArchiveIndex<R: Read + Seek> {
    reader: R,
    header: ArchiveHeader,
    entries: Vec<IndexEntry>,
    stream_len: u64,
    options: ArchiveOptions,
}

impl ArchiveIndex<BufReader<File>> {
    /// Open and parse an archive file with default options
    pub fn open<P: AsRef<Path>>(path: P) -> ArchiveResult<Self> {
        Self::open_with(path, ArchiveOptions::default())
    }

    /// Open and parse an archive file
    ///
    /// The file handle is dropped before returning if parsing fails.
    pub fn open_with<P: AsRef<Path>>(path: P, options: ArchiveOptions) -> ArchiveResult<Self> {
        let path = path.as_ref();
        info!("Opening asset package: {}", path.display());
        let file = File::open(path)?;
        Self::from_reader_with(BufReader::new(file), options)
    }
}

impl<R: Read + Seek> ArchiveIndex<R> {
    /// Parse an archive from any seekable reader with default options
    pub fn from_reader(reader: R) -> ArchiveResult<Self> {
        Self::from_reader_with(reader, ArchiveOptions::default())
    }

    /// Parse an archive from any seekable reader
    ///
    /// The reader is rewound to offset 0 first. No partially parsed archive is
    /// ever returned: any header, index or validation failure consumes the
    /// reader and reports the error.
    pub fn from_reader_with(mut reader: R, options: ArchiveOptions) -> ArchiveResult<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let stream_len = stream_len(&mut reader)?;

        let header = ArchiveHeader::parse(&mut reader)?;
        let entries = parse_index(&mut reader, &header)?;
        header.validate_layout()?;

        if options.validation == Validation::Eager {
            let data_start = u64::from(header.data_start);
            if data_start > stream_len && !entries.is_empty() {
                return Err(ArchiveError::TruncatedInput {
                    context: "data region",
                    expected: data_start,
                    available: stream_len,
                });
            }
            validate_entries(&entries, stream_len.saturating_sub(data_start))?;
        }

        debug!(
            "Opened asset package: version {}, {} entries, {} bytes",
            header.format_version(),
            entries.len(),
            stream_len
        );

        Ok(Self {
            reader,
            header,
            entries,
            stream_len,
            options,
        })
    }

    /// Parsed header
    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// Index entries in on-disk order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Options the archive was opened with
    pub fn options(&self) -> ArchiveOptions {
        self.options
    }

    /// Total archive length measured at open time
    pub fn stream_len(&self) -> u64 {
        self.stream_len
    }

    /// Length of the data region measured at open time
    pub fn data_region_len(&self) -> u64 {
        self.stream_len
            .saturating_sub(u64::from(self.header.data_start))
    }

    /// Entry at `position`
    pub fn entry(&self, position: usize) -> ArchiveResult<&IndexEntry> {
        self.entries
            .get(position)
            .ok_or(ArchiveError::IndexOutOfRange {
                position,
                count: self.entries.len(),
            })
    }

    /// Positions of every entry carrying `id`, in on-disk order
    ///
    /// Identifiers are not required to be unique, so no single match is
    /// preferred over another.
    pub fn positions_of(&self, id: u64) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, entry)| entry.id == id)
            .map(|(position, _)| position)
    }

    /// Read the payload of the entry at `position`
    ///
    /// Seeks to `data_start + relative_start` and returns exactly `size` bytes.
    /// Failures leave the parsed index intact.
    pub fn read_entry(&mut self, position: usize) -> ArchiveResult<Vec<u8>> {
        let entry = *self.entry(position)?;
        let range = entry.absolute_range(self.header.data_start);
        trace!(
            "Reading entry {} (id {}) at {}..{}",
            position, entry.id, range.start, range.end
        );

        self.reader.seek(SeekFrom::Start(range.start))?;
        let available = remaining_len(&mut self.reader)?;
        let expected = u64::from(entry.size);
        if available < expected {
            return Err(ArchiveError::TruncatedInput {
                context: "entry payload",
                expected,
                available,
            });
        }

        let mut data = vec![0u8; entry.size as usize];
        self.reader.read_exact(&mut data)?;
        Ok(data)
    }

    /// Release the archive and return the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::constants::HEADER_SIZE;
    use binrw::BinWrite;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn build(header: ArchiveHeader, entries: &[IndexEntry], data: &[u8]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        header.write(&mut cursor).unwrap();
        for entry in entries {
            entry.write(&mut cursor).unwrap();
        }
        let mut bytes = cursor.into_inner();
        bytes.extend_from_slice(data);
        bytes
    }

    fn sample() -> Vec<u8> {
        build(
            ArchiveHeader::new(1, 2, 44),
            &[IndexEntry::new(100, 0, 5), IndexEntry::new(200, 5, 3)],
            b"helloabc",
        )
    }

    #[test]
    fn test_sample_archive() {
        let bytes = sample();
        assert_eq!(
            &bytes[..12],
            &[0x01, 0, 0, 0, 0x02, 0, 0, 0, 0x2C, 0, 0, 0]
        );

        let mut archive = ArchiveIndex::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.header().format_version().to_string(), "0.0.1");
        assert_eq!(archive.data_region_len(), 8);

        assert_eq!(archive.read_entry(0).unwrap(), b"hello");
        assert_eq!(archive.read_entry(1).unwrap(), b"abc");
        assert!(matches!(
            archive.read_entry(2),
            Err(ArchiveError::IndexOutOfRange {
                position: 2,
                count: 2
            })
        ));

        // Failed retrieval does not disturb later reads
        assert_eq!(archive.read_entry(0).unwrap(), b"hello");
    }

    #[test]
    fn test_random_access_order() {
        let mut archive = ArchiveIndex::from_reader(Cursor::new(sample())).unwrap();
        assert_eq!(archive.read_entry(1).unwrap(), b"abc");
        assert_eq!(archive.read_entry(0).unwrap(), b"hello");
        assert_eq!(archive.read_entry(1).unwrap(), b"abc");
    }

    #[test]
    fn test_empty_archive() {
        let bytes = build(ArchiveHeader::new(0x000100, 0, HEADER_SIZE as u32), &[], &[]);
        let mut archive = ArchiveIndex::from_reader(Cursor::new(bytes)).unwrap();

        assert!(archive.is_empty());
        assert!(matches!(
            archive.read_entry(0),
            Err(ArchiveError::IndexOutOfRange {
                position: 0,
                count: 0
            })
        ));
    }

    #[test]
    fn test_reader_is_rewound() {
        let mut cursor = Cursor::new(sample());
        cursor.set_position(17);
        let archive = ArchiveIndex::from_reader(cursor).unwrap();
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_eager_rejects_overrun() {
        let bytes = build(
            ArchiveHeader::new(1, 2, 44),
            &[IndexEntry::new(100, 0, 5), IndexEntry::new(200, 5, 4)],
            b"helloabc",
        );
        let err = ArchiveIndex::from_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::CorruptIndexEntry {
                position: 1,
                id: 200,
                data_len: 8,
                ..
            }
        ));
    }

    #[test]
    fn test_lazy_defers_overrun_to_read() {
        let bytes = build(
            ArchiveHeader::new(1, 2, 44),
            &[IndexEntry::new(100, 0, 5), IndexEntry::new(200, 5, 4)],
            b"helloabc",
        );
        let options = ArchiveOptions::new().with_validation(Validation::Lazy);
        let mut archive = ArchiveIndex::from_reader_with(Cursor::new(bytes), options).unwrap();

        assert_eq!(archive.read_entry(0).unwrap(), b"hello");
        assert!(matches!(
            archive.read_entry(1),
            Err(ArchiveError::TruncatedInput {
                context: "entry payload",
                expected: 4,
                available: 3,
            })
        ));
    }

    #[test]
    fn test_missing_data_region() {
        let bytes = build(
            ArchiveHeader::new(1, 1, 100),
            &[IndexEntry::new(1, 0, 0)],
            &[],
        );
        let err = ArchiveIndex::from_reader(Cursor::new(bytes.clone())).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::TruncatedInput {
                context: "data region",
                ..
            }
        ));

        let options = ArchiveOptions::new().with_validation(Validation::Lazy);
        let mut archive = ArchiveIndex::from_reader_with(Cursor::new(bytes), options).unwrap();
        assert_eq!(archive.data_region_len(), 0);
        assert!(archive.read_entry(0).unwrap().is_empty());
    }

    #[test]
    fn test_overlapping_layout_rejected() {
        let bytes = build(
            ArchiveHeader::new(1, 2, 20),
            &[IndexEntry::new(1, 0, 1), IndexEntry::new(2, 1, 1)],
            b"xy",
        );
        assert!(matches!(
            ArchiveIndex::from_reader(Cursor::new(bytes)),
            Err(ArchiveError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_data_start_inside_index_table() {
        // Two records end the index table at 44, so a data region at 40 overlaps it
        let mut bytes = vec![
            0x01, 0x00, 0x00, 0x00, // version
            0x02, 0x00, 0x00, 0x00, // entry count
            0x28, 0x00, 0x00, 0x00, // data start
        ];
        bytes.extend_from_slice(&build(
            ArchiveHeader::new(1, 2, 44),
            &[IndexEntry::new(100, 0, 5), IndexEntry::new(200, 5, 3)],
            b"helloabc",
        )[HEADER_SIZE..]);

        let err = ArchiveIndex::from_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, ArchiveError::InvalidHeader { .. }));
    }

    #[test]
    fn test_truncated_index_reported_before_layout() {
        let bytes = build(ArchiveHeader::new(1, 1000, 40), &[], &[]);
        let err = ArchiveIndex::from_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::TruncatedInput {
                context: "index table",
                expected: 16000,
                available: 0,
            }
        ));
    }

    #[test]
    fn test_positions_of_duplicates() {
        let bytes = build(
            ArchiveHeader::new(1, 3, 60),
            &[
                IndexEntry::new(7, 0, 1),
                IndexEntry::new(8, 1, 1),
                IndexEntry::new(7, 2, 1),
            ],
            b"abc",
        );
        let archive = ArchiveIndex::from_reader(Cursor::new(bytes)).unwrap();

        assert_eq!(archive.positions_of(7).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(archive.positions_of(8).collect::<Vec<_>>(), vec![1]);
        assert_eq!(archive.positions_of(9).count(), 0);
    }

    #[test]
    fn test_gap_between_index_and_data() {
        let mut data = vec![0xEE; 4];
        data.extend_from_slice(b"payload");
        let bytes = build(
            ArchiveHeader::new(1, 1, 32),
            &[IndexEntry::new(1, 0, 7)],
            &data,
        );
        let mut archive = ArchiveIndex::from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.read_entry(0).unwrap(), b"payload");
    }
}
