//! The output offset tracker: a thin `AsyncWrite` adapter that forwards
//! to an inner writer and counts bytes actually accepted.
//!
//! Grounded in the pack's `AsyncOffsetWriter` (`async-zip`'s
//! `base::write::io::offset`) and the teacher's own `CrcCountingWriter`
//! in `writer.rs`: both wrap the real sink so the coordinator always
//! knows the true byte offset without re-deriving it from buffered state.

use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Wraps an `AsyncWrite` sink, tracking the number of bytes written to it.
pub struct OffsetWriter<W> {
    inner: W,
    offset: u64,
}

impl<W: AsyncWrite + Unpin> OffsetWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, offset: 0 }
    }

    /// Total bytes handed to the inner sink so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub async fn shutdown(&mut self) -> std::io::Result<()> {
        self.inner.flush().await?;
        self.inner.shutdown().await
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for OffsetWriter<W> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        let poll = Pin::new(&mut self.inner).poll_write(cx, buf);
        if let Poll::Ready(Ok(n)) = &poll {
            self.offset += *n as u64;
        }
        poll
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}
