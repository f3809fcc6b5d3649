//! Segment passthrough streaming.
//!
//! # Responsibilities
//! - Forward upstream body chunks as soon as they arrive
//! - Cap each written chunk at the configured size
//! - Account delivered bytes and report early client aborts
//!
//! # Design Decisions
//! - No buffering beyond the chunk currently being split
//! - Slicing uses `Bytes::split_to`, so no copies
//! - A drop before upstream end-of-stream means hyper stopped polling,
//!   i.e. the client went away; that is logged and never retried

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::{BoxStream, Stream, StreamExt};

use crate::observability::metrics;

/// Re-chunking stream over an upstream response body.
pub struct SegmentStream<E> {
    inner: BoxStream<'static, Result<Bytes, E>>,
    pending: Bytes,
    chunk_size: usize,
    target: String,
    delivered: u64,
    finished: bool,
}

impl<E> SegmentStream<E> {
    pub fn new<S>(inner: S, chunk_size: usize, target: impl Into<String>) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    {
        Self {
            inner: inner.boxed(),
            pending: Bytes::new(),
            chunk_size: chunk_size.max(1),
            target: target.into(),
            delivered: 0,
            finished: false,
        }
    }

    fn take_chunk(&mut self) -> Bytes {
        let n = self.pending.len().min(self.chunk_size);
        let chunk = self.pending.split_to(n);
        self.delivered += chunk.len() as u64;
        chunk
    }

    fn finish(&mut self) {
        self.finished = true;
        metrics::record_segment_bytes(self.delivered);
    }
}

impl<E: std::fmt::Display> Stream for SegmentStream<E> {
    type Item = Result<Bytes, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.finished {
            return Poll::Ready(None);
        }

        loop {
            if !this.pending.is_empty() {
                return Poll::Ready(Some(Ok(this.take_chunk())));
            }

            match this.inner.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    // Empty chunks are skipped
                    this.pending = bytes;
                }
                Poll::Ready(Some(Err(e))) => {
                    tracing::error!(
                        target_url = %this.target,
                        delivered = this.delivered,
                        error = %e,
                        "Upstream body failed mid-stream"
                    );
                    this.finish();
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    tracing::debug!(
                        target_url = %this.target,
                        bytes = this.delivered,
                        "Segment streamed"
                    );
                    this.finish();
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<E> Drop for SegmentStream<E> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!(
                target_url = %self.target,
                delivered = self.delivered,
                "Client disconnected mid-stream, aborting passthrough"
            );
            metrics::record_segment_bytes(self.delivered);
        }
    }
}
