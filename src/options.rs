//! Caller-facing configuration: per-entry options, archive-level
//! options, and the finalize override list.
//!
//! Built the way the teacher's `ParallelConfig` is built in
//! `parallel.rs`: a `Default` impl plus `with_*` builder methods that
//! consume and return `Self`.

use crate::error::{Error, Result};
use crate::format::{METHOD_DEFLATE, METHOD_STORE};
use crate::timestamp::Timestamp;

const MAX_NAME_OR_COMMENT_LEN: usize = 65_535;

/// Options for a single entry, supplied by the caller before
/// submission and frozen once `add_entry` is called.
#[derive(Debug, Clone)]
pub struct EntryOptions {
    pub(crate) name: String,
    pub(crate) comment: String,
    pub(crate) date: Timestamp,
    pub(crate) mode: u16,
    pub(crate) store: bool,
}

impl EntryOptions {
    /// Create options for an entry named `name`, DEFLATE-compressed,
    /// timestamped at the current time, no comment, mode 0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: String::new(),
            date: Timestamp::now(),
            mode: 0,
            store: false,
        }
    }

    /// Attach a comment to this entry (encoded length must be ≤ 65535 bytes).
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Override the entry's timestamp (must fall within 1980-01-01 .. 2107-12-31).
    pub fn with_date(mut self, date: Timestamp) -> Self {
        self.date = date;
        self
    }

    /// Set the Unix file mode recorded in the entry's external attributes.
    pub fn with_mode(mut self, mode: u16) -> Self {
        self.mode = mode;
        self
    }

    /// Use STORE (method 0) instead of the default DEFLATE (method 8).
    pub fn stored(mut self) -> Self {
        self.store = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn date(&self) -> Timestamp {
        self.date
    }

    pub fn mode(&self) -> u16 {
        self.mode
    }

    pub(crate) fn compression_method(&self) -> u16 {
        if self.store {
            METHOD_STORE
        } else {
            METHOD_DEFLATE
        }
    }

    /// Validate the synchronous, pre-I/O rules from spec §7: name/comment
    /// length limits and the DOS-representable date range.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.len() > MAX_NAME_OR_COMMENT_LEN {
            return Err(Error::InvalidOptions(format!(
                "entry name is {} bytes, exceeds the {}-byte limit",
                self.name.len(),
                MAX_NAME_OR_COMMENT_LEN
            )));
        }
        if self.comment.len() > MAX_NAME_OR_COMMENT_LEN {
            return Err(Error::InvalidOptions(format!(
                "entry comment is {} bytes, exceeds the {}-byte limit",
                self.comment.len(),
                MAX_NAME_OR_COMMENT_LEN
            )));
        }
        if !self.date.in_dos_range() {
            return Err(Error::InvalidOptions(format!(
                "entry date year {} is outside the representable MS-DOS range (1980-2107)",
                self.date.year
            )));
        }
        Ok(())
    }
}

/// A function used to compute CRC-32, overriding the default
/// (`crc32fast`) implementation. `seed` is the running CRC to extend.
pub type Crc32Fn = dyn Fn(&[u8], u32) -> u32 + Send + Sync;

/// Archive-level options, supplied once when the archive is created.
#[derive(Clone)]
pub struct ArchiveOptions {
    pub(crate) crc32: Option<std::sync::Arc<Crc32Fn>>,
}

impl std::fmt::Debug for ArchiveOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveOptions")
            .field("crc32", &self.crc32.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self { crc32: None }
    }
}

impl ArchiveOptions {
    /// Override the CRC-32 primitive used for every entry's payload checksum.
    pub fn with_crc32(mut self, crc32: impl Fn(&[u8], u32) -> u32 + Send + Sync + 'static) -> Self {
        self.crc32 = Some(std::sync::Arc::new(crc32));
        self
    }
}

/// One entry in a `finalize` override: the index (in submission order)
/// of the existing entry being re-described, plus the metadata fields
/// the caller is allowed to change.
#[derive(Debug, Clone)]
pub struct EntryOverride {
    pub index: usize,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub date: Option<Timestamp>,
    pub mode: Option<u16>,
    pub store: Option<bool>,
}

impl EntryOverride {
    /// Re-describe the entry submitted `index`-th (0-based, submission order).
    pub fn of(index: usize) -> Self {
        Self { index, name: None, comment: None, date: None, mode: None, store: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_date(mut self, date: Timestamp) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_mode(mut self, mode: u16) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_store(mut self, store: bool) -> Self {
        self.store = Some(store);
        self
    }
}
