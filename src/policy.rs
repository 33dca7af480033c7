//! ZIP32 ↔ ZIP64 promotion policy.
//!
//! Pure predicates over already-known sizes; no I/O, no entry state.
//! The `>=` (not `>`) boundary matches the sentinel reservations: a
//! field that is *exactly* the sentinel value would be indistinguishable
//! from "ZIP64 in use", so it is promoted too.

use crate::format::{MAX_U16, ZIP64_THRESHOLD};

/// An entry needs ZIP64 iff any of its sizes, or its local header
/// offset, would collide with the 32-bit sentinel value.
pub fn entry_needs_zip64(uncompressed_size: u64, compressed_size: u64, start_offset: u64) -> bool {
    uncompressed_size >= ZIP64_THRESHOLD
        || compressed_size >= ZIP64_THRESHOLD
        || start_offset >= ZIP64_THRESHOLD
}

/// The end-of-central-directory record needs ZIP64 iff the entry count,
/// central directory size, or central directory offset would collide
/// with their respective 16-/32-bit sentinel values.
pub fn eocd_needs_zip64(entries_count: u64, cd_size: u64, cd_offset: u64) -> bool {
    entries_count >= MAX_U16 || cd_size >= ZIP64_THRESHOLD || cd_offset >= ZIP64_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_below_threshold_is_not_zip64() {
        assert!(!entry_needs_zip64(0, 0, 0));
        assert!(!entry_needs_zip64(ZIP64_THRESHOLD - 1, ZIP64_THRESHOLD - 1, ZIP64_THRESHOLD - 1));
    }

    #[test]
    fn entry_at_or_above_threshold_is_zip64() {
        assert!(entry_needs_zip64(ZIP64_THRESHOLD, 0, 0));
        assert!(entry_needs_zip64(0, ZIP64_THRESHOLD, 0));
        assert!(entry_needs_zip64(0, 0, ZIP64_THRESHOLD));
    }

    #[test]
    fn eocd_below_thresholds_is_not_zip64() {
        assert!(!eocd_needs_zip64(MAX_U16 - 1, ZIP64_THRESHOLD - 1, ZIP64_THRESHOLD - 1));
    }

    #[test]
    fn eocd_at_entry_count_threshold_is_zip64() {
        assert!(eocd_needs_zip64(MAX_U16, 0, 0));
    }

    #[test]
    fn eocd_at_size_or_offset_threshold_is_zip64() {
        assert!(eocd_needs_zip64(1, ZIP64_THRESHOLD, 0));
        assert!(eocd_needs_zip64(1, 0, ZIP64_THRESHOLD));
    }
}
