//! Completed entry metadata and the archive-level finalize summary.

use crate::timestamp::Timestamp;

/// The metadata of one fully-written entry.
///
/// `start_offset`, `crc32`, `compressed_size`, `uncompressed_size` and
/// `zip64` are frozen the moment the entry is appended to the archive's
/// entry list; only `name`, `comment`, `date`, `mode` and `store` may
/// later be changed, and only via a `finalize` override.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    pub name: String,
    pub comment: String,
    pub date: Timestamp,
    pub mode: u16,
    pub store: bool,

    /// Byte offset of this entry's local file header in the output stream.
    pub start_offset: u64,
    /// CRC-32 of the entry's uncompressed payload.
    pub crc32: u32,
    /// Uncompressed payload size, in bytes.
    pub uncompressed_size: u64,
    /// Compressed payload size, in bytes (equal to `uncompressed_size` for STORE entries).
    pub compressed_size: u64,
    /// True iff this entry required ZIP64 fields.
    pub zip64: bool,
}

impl EntryRecord {
    pub(crate) fn compression_method(&self) -> u16 {
        if self.store {
            crate::format::METHOD_STORE
        } else {
            crate::format::METHOD_DEFLATE
        }
    }

    pub(crate) fn external_attrs(&self) -> u32 {
        (self.mode as u32) << 16
    }
}

/// Summary returned by `finalize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// True iff any entry, or the EOCD itself, required ZIP64.
    pub zip64: bool,
    /// Sum of every entry's `uncompressed_size`.
    pub uncompressed_entries_size: u64,
    /// Sum of every entry's `compressed_size`.
    pub compressed_entries_size: u64,
    /// Total bytes written to the output sink.
    pub file_size: u64,
}
