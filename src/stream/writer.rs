//! Writes values to an async byte stream.

use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::codec::encode_value;
use crate::error::StreamError;
use crate::types::Value;

/// Writes MessagePack values to an `AsyncWrite` stream.
///
/// Values are written back to back with no separator; a [`ValueReader`]
/// on the other end splits them again by their own length prefixes.
///
/// [`ValueReader`]: super::ValueReader
pub struct ValueWriter<W> {
    writer: W,
    buf: BytesMut,
}

impl<W: AsyncWrite + Unpin> ValueWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            buf: BytesMut::new(),
        }
    }

    /// Encodes and writes one value.
    pub async fn write_value(&mut self, value: &Value) -> Result<(), StreamError> {
        self.buf.clear();
        encode_value(&mut self.buf, value);
        self.writer.write_all(&self.buf).await?;
        tracing::trace!(bytes = self.buf.len(), "wrote value");
        Ok(())
    }

    /// Flushes the underlying writer.
    pub async fn flush(&mut self) -> Result<(), StreamError> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::ValueReader;
    use std::io::Cursor;

    #[tokio::test]
    async fn write_single_value() {
        let mut output: Vec<u8> = Vec::new();
        let mut writer = ValueWriter::new(&mut output);
        writer.write_value(&Value::map([("c", "cookie")])).await.unwrap();
        writer.flush().await.unwrap();

        assert_eq!(
            output,
            vec![0x81, 0xA1, 0x63, 0xA6, 0x63, 0x6F, 0x6F, 0x6B, 0x69, 0x65]
        );
    }

    #[tokio::test]
    async fn values_are_concatenated() {
        let mut writer = ValueWriter::new(Vec::<u8>::new());
        writer.write_value(&Value::Nil).await.unwrap();
        writer.write_value(&Value::Int(-1)).await.unwrap();
        writer.write_value(&Value::Bool(true)).await.unwrap();
        assert_eq!(writer.into_inner(), vec![0xC0, 0xFF, 0xC3]);
    }

    #[tokio::test]
    async fn writer_feeds_reader() {
        let values = vec![
            Value::from("Hello, world!"),
            Value::Array(vec![Value::UInt(1), Value::Float32(2.5)]),
            Value::ext(3, vec![1u8, 2, 3, 4]),
        ];

        let mut writer = ValueWriter::new(Vec::<u8>::new());
        for value in &values {
            writer.write_value(value).await.unwrap();
        }

        let mut reader = ValueReader::new(Cursor::new(writer.into_inner()));
        for expected in values {
            assert_eq!(reader.read_value().await.unwrap(), Some(expected));
        }
        assert_eq!(reader.read_value().await.unwrap(), None);
    }
}
