//! Finds where a buffered value ends without decoding it.
//!
//! Every MessagePack header states how many bytes or child values follow,
//! so a value is complete once the count of outstanding values drops to
//! zero and every skipped payload is buffered. The scan resumes where it
//! stopped, so each byte is examined once however it arrives.

use crate::codec::marker;

#[derive(Debug)]
pub(crate) struct ValueScanner {
    /// Start of the next unread header, or the end of the value once
    /// `pending` is zero. May run past the buffered bytes.
    offset: usize,
    /// Values still to be read before the top-level value is complete.
    pending: u64,
}

impl ValueScanner {
    pub(crate) fn new() -> Self {
        Self {
            offset: 0,
            pending: 1,
        }
    }

    /// Bytes the value is known to need so far.
    pub(crate) fn known_len(&self) -> usize {
        self.offset
    }

    /// Returns the encoded length once `buf` holds a complete value.
    ///
    /// `buf` must start with the same bytes on every call; only more may be
    /// appended between calls.
    pub(crate) fn scan(&mut self, buf: &[u8]) -> Option<usize> {
        while self.pending > 0 {
            let &tag = buf.get(self.offset)?;
            let (size, children) = measure(tag, &buf[self.offset + 1..])?;
            self.offset = self.offset.saturating_add(1).saturating_add(size);
            self.pending = (self.pending - 1).saturating_add(children);
        }
        (self.offset <= buf.len()).then_some(self.offset)
    }
}

/// Returns the bytes following `tag` that belong to the item itself, and
/// how many child values come after them. `None` if a length or count
/// field is not buffered yet.
///
/// The reserved tag measures as a single byte; decoding reports it.
fn measure(tag: u8, rest: &[u8]) -> Option<(usize, u64)> {
    match tag {
        0x00..=0x7F | 0xE0..=0xFF => Some((0, 0)),
        0x80..=0x8F => Some((0, 2 * u64::from(tag & 0x0F))),
        0x90..=0x9F => Some((0, u64::from(tag & 0x0F))),
        0xA0..=0xBF => Some((usize::from(tag & 0x1F), 0)),

        marker::NIL | marker::RESERVED | marker::FALSE | marker::TRUE => Some((0, 0)),

        marker::BIN_8 | marker::STR_8 => sized(rest, 1, 0),
        marker::BIN_16 | marker::STR_16 => sized(rest, 2, 0),
        marker::BIN_32 | marker::STR_32 => sized(rest, 4, 0),

        // Extended payloads are preceded by their one-byte type.
        marker::EXT_8 => sized(rest, 1, 1),
        marker::EXT_16 => sized(rest, 2, 1),
        marker::EXT_32 => sized(rest, 4, 1),

        marker::UINT_8 | marker::INT_8 => Some((1, 0)),
        marker::UINT_16 | marker::INT_16 => Some((2, 0)),
        marker::UINT_32 | marker::INT_32 | marker::FLOAT_32 => Some((4, 0)),
        marker::UINT_64 | marker::INT_64 | marker::FLOAT_64 => Some((8, 0)),

        marker::FIXEXT_1 => Some((2, 0)),
        marker::FIXEXT_2 => Some((3, 0)),
        marker::FIXEXT_4 => Some((5, 0)),
        marker::FIXEXT_8 => Some((9, 0)),
        marker::FIXEXT_16 => Some((17, 0)),

        marker::ARRAY_16 => Some((2, read_field(rest, 2)?)),
        marker::ARRAY_32 => Some((4, read_field(rest, 4)?)),
        marker::MAP_16 => Some((2, 2 * read_field(rest, 2)?)),
        marker::MAP_32 => Some((4, 2 * read_field(rest, 4)?)),
    }
}

/// A length field of `width` bytes followed by `extra + length` bytes.
fn sized(rest: &[u8], width: usize, extra: usize) -> Option<(usize, u64)> {
    let len = usize::try_from(read_field(rest, width)?).unwrap_or(usize::MAX);
    Some((width.saturating_add(extra).saturating_add(len), 0))
}

/// Big-endian unsigned field of `width` bytes.
fn read_field(rest: &[u8], width: usize) -> Option<u64> {
    let bytes = rest.get(..width)?;
    Some(bytes.iter().fold(0, |acc, &b| (acc << 8) | u64::from(b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::types::Value;

    fn samples() -> Vec<Value> {
        vec![
            Value::Nil,
            Value::UInt(u64::MAX),
            Value::Int(-0x8001),
            Value::Float32(1.5),
            Value::Float64(-2.25),
            Value::from("short"),
            Value::Str("s".repeat(300)),
            Value::Bin(vec![0; 70_000]),
            Value::ext(1, vec![0xAAu8; 16]),
            Value::ext(2, vec![0xAAu8; 3]),
            Value::ext(3, vec![0xAAu8; 300]),
            Value::Array(vec![Value::Nil; 20]),
            Value::map((0..20i64).map(|i| (i, Value::Array(vec![Value::from(i); 3])))),
            Value::map([(Value::Array(vec![]), Value::map([("k", Value::Bin(vec![1, 2]))]))]),
        ]
    }

    #[test]
    fn whole_buffer_measures_exactly() {
        for value in samples() {
            let mut packed = encode::encode(&value);
            let len = packed.len();
            packed.extend_from_slice(&[0xC3, 0xC0]);
            assert_eq!(ValueScanner::new().scan(&packed), Some(len), "failed for {value}");
        }
    }

    #[test]
    fn completes_only_at_the_last_byte() {
        for value in samples() {
            let packed = encode::encode(&value);
            let mut scanner = ValueScanner::new();
            for end in 0..packed.len() {
                assert_eq!(scanner.scan(&packed[..end]), None, "early end for {value}");
                assert!(scanner.known_len() <= packed.len());
            }
            assert_eq!(scanner.scan(&packed), Some(packed.len()));
        }
    }

    #[test]
    fn declared_length_is_known_before_payload() {
        let mut scanner = ValueScanner::new();
        assert_eq!(scanner.scan(&[0xC6, 0x00, 0x10, 0x00, 0x00]), None);
        assert_eq!(scanner.known_len(), 5 + 0x10_0000);
    }

    #[test]
    fn reserved_tag_ends_the_scan() {
        assert_eq!(ValueScanner::new().scan(&[0x92, 0xC0, 0xC1, 0xFF]), Some(3));
    }
}
