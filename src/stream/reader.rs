//! Reads self-delimited values from an async byte stream.

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use super::scan::ValueScanner;
use crate::codec::DecodeOptions;
use crate::error::StreamError;
use crate::types::Value;

/// Default cap on the bytes buffered for a single value (64 MiB).
const DEFAULT_MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

/// Size of each read from the underlying stream.
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads MessagePack values from an `AsyncRead` stream.
///
/// Values carry their own length prefixes, so there is no extra framing.
/// Incoming bytes are scanned for the end of the current value, resuming
/// where the previous read left off; the value is decoded once, when all of
/// it is buffered.
pub struct ValueReader<R> {
    reader: R,
    buf: BytesMut,
    scanner: ValueScanner,
    options: DecodeOptions,
    max_buffer_size: usize,
}

impl<R: AsyncRead + Unpin> ValueReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(READ_CHUNK_SIZE),
            scanner: ValueScanner::new(),
            options: DecodeOptions::new(),
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }

    /// Decodes string tags as binary (see [`DecodeOptions::compatibility`]).
    pub fn compatibility(mut self, enabled: bool) -> Self {
        self.options = self.options.compatibility(enabled);
        self
    }

    /// Limits container nesting (see [`DecodeOptions::max_depth`]).
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.options = self.options.max_depth(limit);
        self
    }

    /// Sets the largest encoded value the reader will buffer.
    pub fn max_buffer_size(mut self, limit: usize) -> Self {
        self.max_buffer_size = limit;
        self
    }

    /// Bytes read from the stream but not yet consumed by a value.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Reads the next value.
    ///
    /// Returns `Ok(None)` when the stream ends cleanly between values.
    pub async fn read_value(&mut self) -> Result<Option<Value>, StreamError> {
        loop {
            if let Some(len) = self.scanner.scan(&self.buf) {
                self.scanner = ValueScanner::new();
                return self.decode_front(len).map(Some);
            }

            if self.buf.len() >= self.max_buffer_size
                || self.scanner.known_len() > self.max_buffer_size
            {
                tracing::debug!(
                    buffered = self.buf.len(),
                    declared = self.scanner.known_len(),
                    "value exceeds buffer limit"
                );
                return Err(StreamError::ValueTooLarge {
                    limit: self.max_buffer_size,
                });
            }

            if !self.buf.is_empty() {
                tracing::trace!(buffered = self.buf.len(), "waiting for more bytes");
            }
            self.buf.reserve(READ_CHUNK_SIZE);
            let n = self.reader.read_buf(&mut self.buf).await?;
            if n == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                tracing::debug!(buffered = self.buf.len(), "stream closed mid-value");
                // Decoding the remainder yields the precise shortfall.
                let len = self.buf.len();
                return self.decode_front(len).map(Some);
            }
        }
    }

    /// Decodes the value in the first `len` buffered bytes and consumes it.
    fn decode_front(&mut self, len: usize) -> Result<Value, StreamError> {
        match self.options.decode(&self.buf[..len]) {
            Ok((value, consumed)) => {
                self.buf.advance(consumed);
                tracing::trace!(consumed, buffered = self.buf.len(), "decoded value");
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(error = %e, "undecodable value in stream");
                Err(e.into())
            }
        }
    }
}
