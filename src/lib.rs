//! A pure-Rust MessagePack value model and codec.
//!
//! This crate converts between a dynamically typed [`Value`] tree and the
//! compact, self-describing MessagePack byte format.
//!
//! # Architecture
//!
//! - **`types`** — The [`Value`] model, equality, hashing and native conversions
//! - **`codec`** — Binary encoding/decoding (tag table, encoder, decoder)
//! - **`stream`** — Reading and writing back-to-back values over async I/O
//! - **`error`** — Decode and stream error types
//!
//! ```
//! use msgpack_value::{Value, decode, encode};
//!
//! let value = Value::map([("compact", Value::Bool(true)), ("schema", Value::UInt(0))]);
//! let bytes = encode(&value);
//! let (decoded, consumed) = decode(&bytes).unwrap();
//! assert_eq!(decoded, value);
//! assert_eq!(consumed, bytes.len());
//! ```

pub mod codec;
pub mod error;
pub mod stream;
pub mod types;

pub use codec::{DecodeOptions, decode, decode_all, decode_with, encode};
pub use error::{DecodeError, StreamError};
pub use types::{Value, ValueMap};
