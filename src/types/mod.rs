//! MessagePack value model and native conversions.

mod convert;
mod value;

pub use value::{Value, ValueMap};
