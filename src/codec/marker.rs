//! MessagePack tag byte constants.

// Nil
pub const NIL: u8 = 0xC0;

// Never used by the format.
pub const RESERVED: u8 = 0xC1;

// Boolean
pub const FALSE: u8 = 0xC2;
pub const TRUE: u8 = 0xC3;

// Binary
pub const BIN_8: u8 = 0xC4;
pub const BIN_16: u8 = 0xC5;
pub const BIN_32: u8 = 0xC6;

// Extended (explicit length)
pub const EXT_8: u8 = 0xC7;
pub const EXT_16: u8 = 0xC8;
pub const EXT_32: u8 = 0xC9;

// Float (IEEE 754)
pub const FLOAT_32: u8 = 0xCA;
pub const FLOAT_64: u8 = 0xCB;

// Unsigned integer (beyond positive fixint range)
pub const UINT_8: u8 = 0xCC;
pub const UINT_16: u8 = 0xCD;
pub const UINT_32: u8 = 0xCE;
pub const UINT_64: u8 = 0xCF;

// Signed integer (beyond negative fixint range)
pub const INT_8: u8 = 0xD0;
pub const INT_16: u8 = 0xD1;
pub const INT_32: u8 = 0xD2;
pub const INT_64: u8 = 0xD3;

// Extended (fixed payload length 1, 2, 4, 8, 16)
pub const FIXEXT_1: u8 = 0xD4;
pub const FIXEXT_2: u8 = 0xD5;
pub const FIXEXT_4: u8 = 0xD6;
pub const FIXEXT_8: u8 = 0xD7;
pub const FIXEXT_16: u8 = 0xD8;

// String
pub const STR_8: u8 = 0xD9;
pub const STR_16: u8 = 0xDA;
pub const STR_32: u8 = 0xDB;

// Array
pub const ARRAY_16: u8 = 0xDC;
pub const ARRAY_32: u8 = 0xDD;

// Map
pub const MAP_16: u8 = 0xDE;
pub const MAP_32: u8 = 0xDF;

// POSITIVE_FIXINT: 0x00..=0x7F (value in the byte itself)
// FIXMAP:          0x80..=0x8F (low nibble = entry count)
// FIXARRAY:        0x90..=0x9F (low nibble = element count)
// FIXSTR:          0xA0..=0xBF (low 5 bits = byte length)
// NEGATIVE_FIXINT: 0xE0..=0xFF (-32..=-1, two's complement)
pub const POSITIVE_FIXINT_MAX: u8 = 0x7F;
pub const FIXMAP_PREFIX: u8 = 0x80;
pub const FIXARRAY_PREFIX: u8 = 0x90;
pub const FIXSTR_PREFIX: u8 = 0xA0;
pub const NEGATIVE_FIXINT_PREFIX: u8 = 0xE0;

/// Largest string byte length that fits in a fixstr tag.
pub const FIXSTR_MAX_LEN: usize = 31;

/// Largest element/entry count the encoder writes as fixarray/fixmap.
///
/// The decoder accepts the full nibble (up to 15).
pub const FIXCONTAINER_MAX_LEN: usize = 14;
