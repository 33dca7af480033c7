//! # streamzip: streaming PKZIP archive writer
//!
//! `streamzip` writes PKZIP (ZIP/ZIP64) archives to any `AsyncWrite`
//! sink, streaming each entry's payload through the output as it's
//! read rather than buffering whole files in memory. Entries may be
//! submitted concurrently; they appear in the output in the order they
//! were submitted.
//!
//! ## Quick start
//!
//! ```no_run
//! use streamzip::{ArchiveWriter, EntryOptions};
//! use std::io::Cursor;
//!
//! # async fn run() -> streamzip::Result<()> {
//! let archive = ArchiveWriter::new(Vec::new());
//!
//! archive
//!     .add_entry(EntryOptions::new("hello.txt"), Cursor::new(b"Hello, World!".to_vec()))
//!     .await?;
//!
//! archive.finalize(None).await?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod entry;
pub mod error;
pub mod format;
pub mod offset;
pub mod options;
pub mod policy;
pub mod record;
pub mod timestamp;

pub use archive::ArchiveWriter;
pub use error::{Error, Result};
pub use options::{ArchiveOptions, EntryOptions, EntryOverride};
pub use record::{ArchiveSummary, EntryRecord};
pub use timestamp::Timestamp;
