//! Value framing over async byte streams.
//!
//! MessagePack values are self-delimiting, so a stream is just encoded
//! values written back to back.

pub mod reader;
mod scan;
pub mod writer;

pub use reader::ValueReader;
pub use writer::ValueWriter;
