//! The archive coordinator: the caller-facing `ArchiveWriter`.
//!
//! Generalizes the teacher's `parallel.rs` bounded-concurrency idiom
//! (`tokio::sync::Semaphore` + `mpsc`, used there to run N whole-file
//! compressions in parallel and reassemble them by index) into the
//! FIFO-mutex design spec §4.5/§9 recommend: a single
//! `tokio::sync::Mutex` serializes concurrently-submitted entries onto
//! one output stream, in the order `add_entry` was called, because
//! tokio's mutex wakes waiters in the order they started waiting.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::entry;
use crate::error::{Error, Result};
use crate::format::{
    encode_central_directory_header, encode_eocd, encode_zip64_eocd_and_locator, CentralDirectoryFields,
};
use crate::offset::OffsetWriter;
use crate::options::{ArchiveOptions, Crc32Fn, EntryOptions, EntryOverride};
use crate::policy::eocd_needs_zip64;
use crate::record::{ArchiveSummary, EntryRecord};

struct ArchiveInner<W> {
    output: OffsetWriter<W>,
    entries: Vec<EntryRecord>,
    finalized: bool,
    /// Set once a mid-entry failure (including a cancelled `add_entry`
    /// future) leaves the output in an indeterminate state.
    poisoned: bool,
}

/// Arms on construction; disarm once the guarded section completes
/// successfully. If dropped still armed, whether from an error
/// propagated with `?` or from the enclosing future being cancelled
/// mid-poll, it poisons the archive so no further bytes are ever
/// written to a half-corrupt stream.
struct PoisonGuard<'a> {
    poisoned: &'a mut bool,
    armed: bool,
}

impl<'a> PoisonGuard<'a> {
    fn new(poisoned: &'a mut bool) -> Self {
        Self { poisoned, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PoisonGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            *self.poisoned = true;
        }
    }
}

/// A streaming PKZIP archive writer.
///
/// Wraps any `AsyncWrite` sink. Entries may be submitted concurrently
/// via [`ArchiveWriter::add_entry`]; they are serialized onto the
/// output in call order. Call [`ArchiveWriter::finalize`] exactly once,
/// after every `add_entry` future has resolved, to write the central
/// directory and close the archive.
pub struct ArchiveWriter<W> {
    inner: Mutex<ArchiveInner<W>>,
    crc32: Arc<Crc32Fn>,
}

impl<W: AsyncWrite + Unpin + Send> ArchiveWriter<W> {
    /// Wrap `output` with default archive options.
    pub fn new(output: W) -> Self {
        Self::with_options(output, ArchiveOptions::default())
    }

    /// Wrap `output`, overriding archive-level options such as the
    /// CRC-32 primitive.
    pub fn with_options(output: W, options: ArchiveOptions) -> Self {
        let crc32: Arc<Crc32Fn> = options.crc32.unwrap_or_else(|| Arc::new(entry::default_crc32));
        Self {
            inner: Mutex::new(ArchiveInner {
                output: OffsetWriter::new(output),
                entries: Vec::new(),
                finalized: false,
                poisoned: false,
            }),
            crc32,
        }
    }

    /// Unwrap the archive, recovering the underlying sink. Typically
    /// called after `finalize` (e.g. to get the bytes back out of an
    /// in-memory `Vec<u8>` sink).
    pub fn into_inner(self) -> W {
        self.inner.into_inner().output.into_inner()
    }

    /// Submit one entry. Validates `options` synchronously before
    /// acquiring the output lock, so malformed options fail immediately
    /// without perturbing archive ordering. Multiple calls may be in
    /// flight at once; their bytes appear in the output in the order
    /// this method was called, regardless of completion order.
    pub async fn add_entry<R>(&self, options: EntryOptions, source: R) -> Result<EntryRecord>
    where
        R: AsyncRead + Unpin + Send,
    {
        options.validate()?;

        let mut guard = self.inner.lock().await;
        if guard.finalized {
            return Err(Error::IllegalState("add_entry called after finalize".into()));
        }
        if guard.poisoned {
            return Err(Error::IllegalState(
                "archive aborted after a prior entry or finalize failure".into(),
            ));
        }

        let inner = &mut *guard;
        let bomb = PoisonGuard::new(&mut inner.poisoned);
        log::trace!("add_entry: writing {:?}", options.name());
        let record = entry::run(&mut inner.output, &options, source, self.crc32.as_ref()).await?;
        log::debug!(
            "add_entry: wrote {:?} ({} bytes uncompressed, zip64={})",
            record.name,
            record.uncompressed_size,
            record.zip64
        );
        inner.entries.push(record.clone());
        bomb.disarm();

        Ok(record)
    }

    /// Snapshot of every entry completed so far. Never observes a
    /// partially-written entry: it blocks on the same lock `add_entry`
    /// and `finalize` use.
    pub async fn entries(&self) -> Vec<EntryRecord> {
        let guard = self.inner.lock().await;
        guard.entries.clone()
    }

    /// Write the central directory and end-of-central-directory records
    /// and close the output. `override_entries`, if given, replaces the
    /// entry list used for the central directory with a permutation or
    /// sub-sequence of it (see [`EntryOverride`]); violations fail
    /// before any central-directory byte is written, and the output is
    /// still closed so a downstream reader doesn't hang waiting for EOF.
    pub async fn finalize(&self, override_entries: Option<Vec<EntryOverride>>) -> Result<ArchiveSummary> {
        let mut guard = self.inner.lock().await;
        if guard.finalized {
            return Err(Error::IllegalState("finalize called twice".into()));
        }
        if guard.poisoned {
            return Err(Error::IllegalState(
                "archive aborted after a prior entry failure".into(),
            ));
        }
        guard.finalized = true;

        let inner = &mut *guard;
        let bomb = PoisonGuard::new(&mut inner.poisoned);

        let entries_to_write = match override_entries {
            Some(overrides) => match apply_override(&inner.entries, overrides) {
                Ok(merged) => merged,
                Err(e) => {
                    let _ = inner.output.shutdown().await;
                    return Err(e);
                }
            },
            None => inner.entries.clone(),
        };

        let cd_offset = inner.output.offset();
        for record in &entries_to_write {
            let (dos_date, dos_time) = record.date.to_dos();
            let header = encode_central_directory_header(&CentralDirectoryFields {
                compression_method: record.compression_method(),
                dos_time,
                dos_date,
                crc32: record.crc32,
                compressed_size: record.compressed_size,
                uncompressed_size: record.uncompressed_size,
                local_header_offset: record.start_offset,
                external_attrs: record.external_attrs(),
                name: record.name.as_bytes(),
                comment: record.comment.as_bytes(),
                zip64: record.zip64,
            });
            inner.output.write_all(&header).await.map_err(Error::Sink)?;
        }
        let cd_size = inner.output.offset() - cd_offset;

        let entry_count = entries_to_write.len() as u64;
        let archive_zip64 =
            entries_to_write.iter().any(|e| e.zip64) || eocd_needs_zip64(entry_count, cd_size, cd_offset);

        if eocd_needs_zip64(entry_count, cd_size, cd_offset) {
            let zip64_eocd_offset = inner.output.offset();
            let block = encode_zip64_eocd_and_locator(entry_count, cd_size, cd_offset, zip64_eocd_offset);
            inner.output.write_all(&block).await.map_err(Error::Sink)?;
        }

        let eocd = encode_eocd(entry_count, cd_size, cd_offset);
        inner.output.write_all(&eocd).await.map_err(Error::Sink)?;
        inner.output.shutdown().await.map_err(Error::Sink)?;

        let uncompressed_entries_size = entries_to_write.iter().map(|e| e.uncompressed_size).sum();
        let compressed_entries_size = entries_to_write.iter().map(|e| e.compressed_size).sum();
        let file_size = inner.output.offset();

        log::debug!(
            "finalize: {} entries, zip64={}, file_size={}",
            entries_to_write.len(),
            archive_zip64,
            file_size
        );

        bomb.disarm();

        Ok(ArchiveSummary {
            zip64: archive_zip64,
            uncompressed_entries_size,
            compressed_entries_size,
            file_size,
        })
    }
}

/// Apply a `finalize` override: re-describe a permutation or
/// sub-sequence of `entries`, failing before any byte is written if an
/// index is out of range, repeated, or the caller implicitly tried to
/// touch a frozen physical field (impossible through `EntryOverride`'s
/// field set, but the index bookkeeping itself is validated here).
fn apply_override(entries: &[EntryRecord], overrides: Vec<EntryOverride>) -> Result<Vec<EntryRecord>> {
    let mut seen = vec![false; entries.len()];
    let mut merged = Vec::with_capacity(overrides.len());

    for over in overrides {
        let Some(original) = entries.get(over.index) else {
            return Err(Error::OverrideInvalid(format!(
                "override references entry index {}, but only {} entries exist",
                over.index,
                entries.len()
            )));
        };
        if seen[over.index] {
            return Err(Error::OverrideInvalid(format!(
                "override references entry index {} more than once",
                over.index
            )));
        }
        seen[over.index] = true;

        let mut record = original.clone();
        if let Some(name) = over.name {
            record.name = name;
        }
        if let Some(comment) = over.comment {
            record.comment = comment;
        }
        if let Some(date) = over.date {
            record.date = date;
        }
        if let Some(mode) = over.mode {
            record.mode = mode;
        }
        if let Some(store) = over.store {
            record.store = store;
        }
        merged.push(record);
    }

    Ok(merged)
}
