//! MessagePack binary encoding format.
//!
//! Every value starts with a tag byte that selects its type and, for the
//! compact forms, carries its length or value inline. All multi-byte
//! integers, lengths and counts are big-endian.

pub mod decode;
pub mod encode;
pub mod marker;

pub use decode::{DEFAULT_MAX_DEPTH, DecodeOptions, decode, decode_all, decode_value, decode_with};
pub use encode::{encode, encode_value};
