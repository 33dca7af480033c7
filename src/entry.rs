//! The entry pipeline: local header, payload (STORE or DEFLATE), data
//! descriptor, for exactly one entry.
//!
//! Restructured from the teacher's push-based `start_entry`/`write_data`/
//! `finish_current_entry` trio in `async_writer.rs` into a single pull
//! loop that reads an `AsyncRead` source to completion, since the
//! coordinator (not the caller) drives each entry end-to-end under its
//! lock.

use async_compression::tokio::write::DeflateEncoder;
use crc32fast::Hasher as Crc32;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};
use crate::format::{encode_data_descriptor, encode_local_file_header, LocalFileHeaderFields};
use crate::offset::OffsetWriter;
use crate::options::EntryOptions;
use crate::policy::entry_needs_zip64;
use crate::record::EntryRecord;

const CHUNK_SIZE: usize = 64 * 1024;

/// Wraps the locked output so the DEFLATE encoder's `shutdown()` (needed
/// to flush the final raw-DEFLATE block) can't reach the real sink's
/// `poll_shutdown`: the archive has more to write after this entry.
struct NoCloseWriter<'a, W>(&'a mut OffsetWriter<W>);

impl<W: AsyncWrite + Unpin> AsyncWrite for NoCloseWriter<'_, W> {
    fn poll_write(mut self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
        Pin::new(&mut *self.0).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut *self.0).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Write one entry's local header, payload and data descriptor to
/// `output`, reading uncompressed bytes from `source` until EOF.
///
/// `options` must already have passed [`EntryOptions::validate`]. On a
/// source or sink error the caller is expected to treat the whole
/// archive as poisoned, per spec §4.2/§7.
pub(crate) async fn run<W, R>(
    output: &mut OffsetWriter<W>,
    options: &EntryOptions,
    mut source: R,
    crc32: &dyn Fn(&[u8], u32) -> u32,
) -> Result<EntryRecord>
where
    W: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
{
    let start_offset = output.offset();
    let (dos_date, dos_time) = options.date().to_dos();

    let header = encode_local_file_header(&LocalFileHeaderFields {
        compression_method: options.compression_method(),
        dos_time,
        dos_date,
        name: options.name().as_bytes(),
    });
    output.write_all(&header).await.map_err(Error::Sink)?;

    let body_start = output.offset();
    let mut crc_state = 0u32;
    let mut uncompressed_size = 0u64;
    let mut buf = vec![0u8; CHUNK_SIZE];

    if options.store {
        loop {
            let n = read_chunk(&mut source, &mut buf).await?;
            if n == 0 {
                break;
            }
            crc_state = crc32(&buf[..n], crc_state);
            uncompressed_size += n as u64;
            output.write_all(&buf[..n]).await.map_err(Error::Sink)?;
        }
    } else {
        let mut encoder = DeflateEncoder::new(NoCloseWriter(output));
        loop {
            let n = read_chunk(&mut source, &mut buf).await?;
            if n == 0 {
                break;
            }
            crc_state = crc32(&buf[..n], crc_state);
            uncompressed_size += n as u64;
            encoder.write_all(&buf[..n]).await.map_err(Error::Sink)?;
        }
        encoder.shutdown().await.map_err(Error::Sink)?;
    }

    let compressed_size = output.offset() - body_start;
    let zip64 = entry_needs_zip64(uncompressed_size, compressed_size, start_offset);

    let descriptor = encode_data_descriptor(crc_state, compressed_size, uncompressed_size, zip64);
    output.write_all(&descriptor).await.map_err(Error::Sink)?;

    Ok(EntryRecord {
        name: options.name().to_string(),
        comment: options.comment().to_string(),
        date: options.date(),
        mode: options.mode(),
        store: options.store,
        start_offset,
        crc32: crc_state,
        uncompressed_size,
        compressed_size,
        zip64,
    })
}

async fn read_chunk<R: AsyncRead + Unpin>(source: &mut R, buf: &mut [u8]) -> Result<usize> {
    use tokio::io::AsyncReadExt;
    source.read(buf).await.map_err(Error::Source)
}

/// Default CRC-32: `crc32fast`, IEEE 802.3 polynomial, matching spec §6.
pub(crate) fn default_crc32(bytes: &[u8], seed: u32) -> u32 {
    let mut hasher = Crc32::new_with_initial(seed);
    hasher.update(bytes);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::EntryOptions;
    use std::io::Cursor;

    async fn run_entry(opts: EntryOptions, data: &[u8]) -> (Vec<u8>, EntryRecord) {
        let mut writer = OffsetWriter::new(Vec::new());
        let record = run(&mut writer, &opts, Cursor::new(data.to_vec()), &default_crc32)
            .await
            .unwrap();
        (writer.into_inner(), record)
    }

    #[tokio::test]
    async fn stored_entry_round_trips_size_and_crc() {
        let opts = EntryOptions::new("hello.txt").stored();
        let (bytes, record) = run_entry(opts, b"Hello, World!").await;
        assert_eq!(record.uncompressed_size, 13);
        assert_eq!(record.compressed_size, 13);
        assert_eq!(record.crc32, 0xEC4A_C3D0);
        assert!(!record.zip64);
        assert_eq!(&bytes[0..4], &[0x50, 0x4b, 0x03, 0x04]);
    }

    #[tokio::test]
    async fn empty_entry_has_zero_sizes_and_crc() {
        let opts = EntryOptions::new("empty.txt").stored();
        let (_, record) = run_entry(opts, b"").await;
        assert_eq!(record.uncompressed_size, 0);
        assert_eq!(record.compressed_size, 0);
        assert_eq!(record.crc32, 0);
    }

    #[tokio::test]
    async fn deflate_entry_compresses_repetitive_data() {
        let opts = EntryOptions::new("a.bin");
        let data = vec![b'A'; 1000];
        let (_, record) = run_entry(opts, &data).await;
        assert_eq!(record.uncompressed_size, 1000);
        assert!(record.compressed_size < record.uncompressed_size);
    }

    #[tokio::test]
    async fn local_header_offset_matches_pre_write_offset() {
        use tokio::io::AsyncWriteExt;
        let mut writer = OffsetWriter::new(Vec::new());
        writer.write_all(b"prefix").await.unwrap();
        let opts = EntryOptions::new("x.txt").stored();
        let record = run(&mut writer, &opts, Cursor::new(b"abc".to_vec()), &default_crc32)
            .await
            .unwrap();
        assert_eq!(record.start_offset, 6);
    }
}
