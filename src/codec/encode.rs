//! MessagePack encoding: `Value` → bytes.
//!
//! Encoding is total. Lengths and counts above `u32::MAX` cannot be
//! represented on the wire and are treated as caller bugs (panic).

use bytes::{BufMut, BytesMut};

use super::marker;
use crate::types::{Value, ValueMap};

/// Encodes a `Value` into a freshly allocated byte vector.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = BytesMut::new();
    encode_value(&mut buf, value);
    buf.to_vec()
}

/// Encodes a `Value` into the buffer using MessagePack format.
pub fn encode_value(buf: &mut BytesMut, value: &Value) {
    match value {
        Value::Nil => encode_nil(buf),
        Value::Bool(b) => encode_bool(buf, *b),
        Value::Int(i) => encode_int(buf, *i),
        Value::UInt(u) => encode_uint(buf, *u),
        Value::Float32(f) => encode_f32(buf, *f),
        Value::Float64(f) => encode_f64(buf, *f),
        Value::Str(s) => encode_str(buf, s),
        Value::Bin(b) => encode_bin(buf, b),
        Value::Array(items) => encode_array(buf, items),
        Value::Map(map) => encode_map(buf, map),
        Value::Extended(t, data) => encode_ext(buf, *t, data),
    }
}

pub fn encode_nil(buf: &mut BytesMut) {
    buf.put_u8(marker::NIL);
}

pub fn encode_bool(buf: &mut BytesMut, value: bool) {
    buf.put_u8(if value { marker::TRUE } else { marker::FALSE });
}

/// Encodes an unsigned integer using the smallest representation.
pub fn encode_uint(buf: &mut BytesMut, value: u64) {
    if value <= u64::from(marker::POSITIVE_FIXINT_MAX) {
        buf.put_u8(value as u8);
    } else if value <= u64::from(u8::MAX) {
        buf.put_u8(marker::UINT_8);
        buf.put_u8(value as u8);
    } else if value <= u64::from(u16::MAX) {
        buf.put_u8(marker::UINT_16);
        buf.put_u16(value as u16);
    } else if value <= u64::from(u32::MAX) {
        buf.put_u8(marker::UINT_32);
        buf.put_u32(value as u32);
    } else {
        buf.put_u8(marker::UINT_64);
        buf.put_u64(value);
    }
}

/// Encodes a signed integer. Non-negative values share the unsigned path.
pub fn encode_int(buf: &mut BytesMut, value: i64) {
    if let Ok(unsigned) = u64::try_from(value) {
        encode_uint(buf, unsigned);
    } else if value >= -32 {
        // NEGATIVE_FIXINT: low five bits of the two's complement.
        buf.put_u8(marker::NEGATIVE_FIXINT_PREFIX | (value as u8 & 0x1F));
    } else if value >= i64::from(i8::MIN) {
        buf.put_u8(marker::INT_8);
        buf.put_i8(value as i8);
    } else if value >= i64::from(i16::MIN) {
        buf.put_u8(marker::INT_16);
        buf.put_i16(value as i16);
    } else if value >= i64::from(i32::MIN) {
        buf.put_u8(marker::INT_32);
        buf.put_i32(value as i32);
    } else {
        buf.put_u8(marker::INT_64);
        buf.put_i64(value);
    }
}

pub fn encode_f32(buf: &mut BytesMut, value: f32) {
    buf.put_u8(marker::FLOAT_32);
    buf.put_f32(value);
}

pub fn encode_f64(buf: &mut BytesMut, value: f64) {
    buf.put_u8(marker::FLOAT_64);
    buf.put_f64(value);
}

/// Encodes a string (size = UTF-8 byte length, not char count).
pub fn encode_str(buf: &mut BytesMut, value: &str) {
    let len = wire_len(value.len(), "string");
    if len as usize <= marker::FIXSTR_MAX_LEN {
        buf.put_u8(marker::FIXSTR_PREFIX | len as u8);
    } else if len <= u32::from(u8::MAX) {
        buf.put_u8(marker::STR_8);
        buf.put_u8(len as u8);
    } else if len <= u32::from(u16::MAX) {
        buf.put_u8(marker::STR_16);
        buf.put_u16(len as u16);
    } else {
        buf.put_u8(marker::STR_32);
        buf.put_u32(len);
    }
    buf.put_slice(value.as_bytes());
}

pub fn encode_bin(buf: &mut BytesMut, value: &[u8]) {
    let len = wire_len(value.len(), "binary");
    if len <= u32::from(u8::MAX) {
        buf.put_u8(marker::BIN_8);
        buf.put_u8(len as u8);
    } else if len <= u32::from(u16::MAX) {
        buf.put_u8(marker::BIN_16);
        buf.put_u16(len as u16);
    } else {
        buf.put_u8(marker::BIN_32);
        buf.put_u32(len);
    }
    buf.put_slice(value);
}

pub fn encode_array(buf: &mut BytesMut, items: &[Value]) {
    encode_array_header(buf, items.len());
    for item in items {
        encode_value(buf, item);
    }
}

/// Writes an array header; the caller must follow it with `len` values.
pub fn encode_array_header(buf: &mut BytesMut, len: usize) {
    let len = wire_len(len, "array");
    if len as usize <= marker::FIXCONTAINER_MAX_LEN {
        buf.put_u8(marker::FIXARRAY_PREFIX | len as u8);
    } else if len <= u32::from(u16::MAX) {
        buf.put_u8(marker::ARRAY_16);
        buf.put_u16(len as u16);
    } else {
        buf.put_u8(marker::ARRAY_32);
        buf.put_u32(len);
    }
}

/// Encodes every entry as key then value, in the map's iteration order.
pub fn encode_map(buf: &mut BytesMut, map: &ValueMap) {
    encode_map_header(buf, map.len());
    for (key, value) in map {
        encode_value(buf, key);
        encode_value(buf, value);
    }
}

/// Writes a map header; the caller must follow it with `len` key/value pairs.
pub fn encode_map_header(buf: &mut BytesMut, len: usize) {
    let len = wire_len(len, "map");
    if len as usize <= marker::FIXCONTAINER_MAX_LEN {
        buf.put_u8(marker::FIXMAP_PREFIX | len as u8);
    } else if len <= u32::from(u16::MAX) {
        buf.put_u8(marker::MAP_16);
        buf.put_u16(len as u16);
    } else {
        buf.put_u8(marker::MAP_32);
        buf.put_u32(len);
    }
}

pub fn encode_ext(buf: &mut BytesMut, type_tag: i8, data: &[u8]) {
    let len = wire_len(data.len(), "extended");
    match len {
        1 => buf.put_u8(marker::FIXEXT_1),
        2 => buf.put_u8(marker::FIXEXT_2),
        4 => buf.put_u8(marker::FIXEXT_4),
        8 => buf.put_u8(marker::FIXEXT_8),
        16 => buf.put_u8(marker::FIXEXT_16),
        len if len <= u32::from(u8::MAX) => {
            buf.put_u8(marker::EXT_8);
            buf.put_u8(len as u8);
        }
        len if len <= u32::from(u16::MAX) => {
            buf.put_u8(marker::EXT_16);
            buf.put_u16(len as u16);
        }
        len => {
            buf.put_u8(marker::EXT_32);
            buf.put_u32(len);
        }
    }
    buf.put_i8(type_tag);
    buf.put_slice(data);
}

fn wire_len(len: usize, what: &str) -> u32 {
    match u32::try_from(len) {
        Ok(len) => len,
        Err(_) => panic!("{what} length {len} exceeds the 32-bit MessagePack limit"),
    }
}
