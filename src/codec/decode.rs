//! MessagePack decoding: bytes → `Value`.
//!
//! Decoding reads strictly forward from any [`Buf`], so a chunked source
//! (for example two buffers joined with [`Buf::chain`]) decodes the same as
//! one contiguous slice.

use bytes::Buf;

use super::marker;
use crate::error::DecodeError;
use crate::types::{Value, ValueMap};

/// Default limit on how deeply arrays and maps may nest.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    compatibility: bool,
    max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            compatibility: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every string tag (fixstr, str8/16/32) as `Bin` instead of `Str`.
    ///
    /// Used for data written by the older format revision that had no
    /// separate binary type.
    pub fn compatibility(mut self, enabled: bool) -> Self {
        self.compatibility = enabled;
        self
    }

    pub fn is_compatibility(&self) -> bool {
        self.compatibility
    }

    /// Sets how many levels of arrays and maps may nest. A top-level
    /// container is level 1; input nested deeper fails with `InvalidData`.
    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = limit;
        self
    }

    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }

    /// Decodes one value from the front of `data`, returning it with the
    /// number of bytes consumed.
    pub fn decode(&self, data: &[u8]) -> Result<(Value, usize), DecodeError> {
        let mut cursor = data;
        let value = self.decode_buf(&mut cursor)?;
        Ok((value, data.len() - cursor.len()))
    }

    /// Decodes a concatenation of values until `data` is exhausted.
    pub fn decode_all(&self, data: &[u8]) -> Result<Vec<Value>, DecodeError> {
        let mut values = Vec::new();
        let mut offset = 0;
        while offset < data.len() {
            let (value, consumed) = self.decode(&data[offset..])?;
            values.push(value);
            offset += consumed;
        }
        Ok(values)
    }

    /// Decodes one value from the buffer, advancing it past the value.
    pub fn decode_buf(&self, buf: &mut impl Buf) -> Result<Value, DecodeError> {
        decode_nested(buf, self, 0)
    }
}

/// Decodes one value from the front of `data`, returning it with the number
/// of bytes consumed.
pub fn decode(data: &[u8]) -> Result<(Value, usize), DecodeError> {
    DecodeOptions::new().decode(data)
}

/// Like [`decode`], with compatibility mode set explicitly.
pub fn decode_with(data: &[u8], compatibility: bool) -> Result<(Value, usize), DecodeError> {
    DecodeOptions::new().compatibility(compatibility).decode(data)
}

/// Decodes every value in a concatenated stream.
pub fn decode_all(data: &[u8]) -> Result<Vec<Value>, DecodeError> {
    DecodeOptions::new().decode_all(data)
}

/// Decodes a single `Value` from the buffer, advancing it past the value.
///
/// On error the buffer position is unspecified; callers that need to retry
/// should decode from a copy of the cursor (as [`decode`] does).
pub fn decode_value(buf: &mut impl Buf, compatibility: bool) -> Result<Value, DecodeError> {
    DecodeOptions::new().compatibility(compatibility).decode_buf(buf)
}

/// `depth` is the number of containers enclosing the value being read.
fn decode_nested(
    buf: &mut impl Buf,
    options: &DecodeOptions,
    depth: usize,
) -> Result<Value, DecodeError> {
    ensure_remaining(buf, 1)?;

    let compatibility = options.compatibility;
    let tag = buf.get_u8();
    match tag {
        // POSITIVE_FIXINT
        0x00..=0x7F => Ok(Value::UInt(u64::from(tag))),

        // FIXMAP
        0x80..=0x8F => decode_map_data(buf, usize::from(tag & 0x0F), options, depth),

        // FIXARRAY
        0x90..=0x9F => decode_array_data(buf, usize::from(tag & 0x0F), options, depth),

        // FIXSTR
        0xA0..=0xBF => decode_str_data(buf, usize::from(tag & 0x1F), compatibility),

        marker::NIL => Ok(Value::Nil),

        marker::RESERVED => Err(DecodeError::InvalidData(format!(
            "reserved tag byte 0x{tag:02X}"
        ))),

        marker::FALSE => Ok(Value::Bool(false)),
        marker::TRUE => Ok(Value::Bool(true)),

        // Binary
        marker::BIN_8 => {
            let len = read_len(buf, 1)?;
            decode_bin_data(buf, len)
        }
        marker::BIN_16 => {
            let len = read_len(buf, 2)?;
            decode_bin_data(buf, len)
        }
        marker::BIN_32 => {
            let len = read_len(buf, 4)?;
            decode_bin_data(buf, len)
        }

        // Extended, explicit length
        marker::EXT_8 => {
            let len = read_len(buf, 1)?;
            decode_ext_data(buf, len)
        }
        marker::EXT_16 => {
            let len = read_len(buf, 2)?;
            decode_ext_data(buf, len)
        }
        marker::EXT_32 => {
            let len = read_len(buf, 4)?;
            decode_ext_data(buf, len)
        }

        // Float
        marker::FLOAT_32 => {
            ensure_remaining(buf, 4)?;
            Ok(Value::Float32(buf.get_f32()))
        }
        marker::FLOAT_64 => {
            ensure_remaining(buf, 8)?;
            Ok(Value::Float64(buf.get_f64()))
        }

        // Unsigned integers zero-extend.
        marker::UINT_8 => {
            ensure_remaining(buf, 1)?;
            Ok(Value::UInt(u64::from(buf.get_u8())))
        }
        marker::UINT_16 => {
            ensure_remaining(buf, 2)?;
            Ok(Value::UInt(u64::from(buf.get_u16())))
        }
        marker::UINT_32 => {
            ensure_remaining(buf, 4)?;
            Ok(Value::UInt(u64::from(buf.get_u32())))
        }
        marker::UINT_64 => {
            ensure_remaining(buf, 8)?;
            Ok(Value::UInt(buf.get_u64()))
        }

        // Signed integers sign-extend.
        marker::INT_8 => {
            ensure_remaining(buf, 1)?;
            Ok(Value::Int(i64::from(buf.get_i8())))
        }
        marker::INT_16 => {
            ensure_remaining(buf, 2)?;
            Ok(Value::Int(i64::from(buf.get_i16())))
        }
        marker::INT_32 => {
            ensure_remaining(buf, 4)?;
            Ok(Value::Int(i64::from(buf.get_i32())))
        }
        marker::INT_64 => {
            ensure_remaining(buf, 8)?;
            Ok(Value::Int(buf.get_i64()))
        }

        // Extended, fixed length
        marker::FIXEXT_1 => decode_ext_data(buf, 1),
        marker::FIXEXT_2 => decode_ext_data(buf, 2),
        marker::FIXEXT_4 => decode_ext_data(buf, 4),
        marker::FIXEXT_8 => decode_ext_data(buf, 8),
        marker::FIXEXT_16 => decode_ext_data(buf, 16),

        // String
        marker::STR_8 => {
            let len = read_len(buf, 1)?;
            decode_str_data(buf, len, compatibility)
        }
        marker::STR_16 => {
            let len = read_len(buf, 2)?;
            decode_str_data(buf, len, compatibility)
        }
        marker::STR_32 => {
            let len = read_len(buf, 4)?;
            decode_str_data(buf, len, compatibility)
        }

        // Array
        marker::ARRAY_16 => {
            let len = read_len(buf, 2)?;
            decode_array_data(buf, len, options, depth)
        }
        marker::ARRAY_32 => {
            let len = read_len(buf, 4)?;
            decode_array_data(buf, len, options, depth)
        }

        // Map
        marker::MAP_16 => {
            let len = read_len(buf, 2)?;
            decode_map_data(buf, len, options, depth)
        }
        marker::MAP_32 => {
            let len = read_len(buf, 4)?;
            decode_map_data(buf, len, options, depth)
        }

        // NEGATIVE_FIXINT: -32..=-1
        0xE0..=0xFF => Ok(Value::Int(i64::from(tag as i8))),
    }
}

fn ensure_remaining(buf: &impl Buf, needed: usize) -> Result<(), DecodeError> {
    if buf.remaining() < needed {
        Err(DecodeError::insufficient(needed, buf.remaining()))
    } else {
        Ok(())
    }
}

/// Reads a big-endian length or count field of `width` bytes.
fn read_len(buf: &mut impl Buf, width: usize) -> Result<usize, DecodeError> {
    ensure_remaining(buf, width)?;
    let len = buf.get_uint(width);
    usize::try_from(len)
        .map_err(|_| DecodeError::InvalidData(format!("length {len} exceeds address space")))
}

fn read_bytes(buf: &mut impl Buf, len: usize) -> Result<Vec<u8>, DecodeError> {
    ensure_remaining(buf, len)?;
    let mut data = vec![0u8; len];
    buf.copy_to_slice(&mut data);
    Ok(data)
}

fn decode_bin_data(buf: &mut impl Buf, len: usize) -> Result<Value, DecodeError> {
    Ok(Value::Bin(read_bytes(buf, len)?))
}

fn decode_str_data(
    buf: &mut impl Buf,
    len: usize,
    compatibility: bool,
) -> Result<Value, DecodeError> {
    let data = read_bytes(buf, len)?;
    if compatibility {
        return Ok(Value::Bin(data));
    }
    let s = String::from_utf8(data)
        .map_err(|e| DecodeError::InvalidData(format!("invalid UTF-8 string: {e}")))?;
    Ok(Value::Str(s))
}

fn decode_ext_data(buf: &mut impl Buf, len: usize) -> Result<Value, DecodeError> {
    ensure_remaining(buf, 1)?;
    let type_tag = buf.get_i8();
    Ok(Value::Extended(type_tag, read_bytes(buf, len)?))
}

/// Returns the depth of a container opened inside `depth` others.
fn enter_container(options: &DecodeOptions, depth: usize) -> Result<usize, DecodeError> {
    let depth = depth + 1;
    if depth > options.max_depth {
        return Err(DecodeError::InvalidData(format!(
            "containers nested deeper than {} levels",
            options.max_depth
        )));
    }
    Ok(depth)
}

fn decode_array_data(
    buf: &mut impl Buf,
    len: usize,
    options: &DecodeOptions,
    depth: usize,
) -> Result<Value, DecodeError> {
    let depth = enter_container(options, depth)?;
    // Every element takes at least one byte, so a hostile count cannot
    // reserve more than the input could ever fill.
    let mut items = Vec::with_capacity(len.min(buf.remaining()));
    for _ in 0..len {
        items.push(decode_nested(buf, options, depth)?);
    }
    Ok(Value::Array(items))
}

fn decode_map_data(
    buf: &mut impl Buf,
    len: usize,
    options: &DecodeOptions,
    depth: usize,
) -> Result<Value, DecodeError> {
    let depth = enter_container(options, depth)?;
    let mut map = ValueMap::with_capacity(len.min(buf.remaining() / 2));
    for _ in 0..len {
        let key = decode_nested(buf, options, depth)?;
        let value = decode_nested(buf, options, depth)?;
        // Duplicate keys: last one wins.
        map.insert(key, value);
    }
    Ok(Value::Map(map))
}
