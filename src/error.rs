//! Error types for decoding and stream framing.

/// Errors produced while decoding a MessagePack value.
///
/// There are exactly two kinds. Both abort the current decode; no partial
/// value is returned and the input is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The source ended before a tag, length, type byte or payload was complete.
    #[error("insufficient data: need {needed} bytes but only {remaining} remaining")]
    InsufficientData { needed: usize, remaining: usize },

    /// The bytes do not form a legal encoding.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl DecodeError {
    pub(crate) fn insufficient(needed: usize, remaining: usize) -> Self {
        Self::InsufficientData { needed, remaining }
    }

    /// Returns true if more bytes could turn this failure into a success.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }

    /// Returns true if the input is malformed regardless of what follows.
    pub fn is_invalid_data(&self) -> bool {
        matches!(self, Self::InvalidData(_))
    }
}

/// Errors produced by [`ValueReader`](crate::stream::ValueReader) and
/// [`ValueWriter`](crate::stream::ValueWriter).
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("buffered value exceeds {limit} bytes")]
    ValueTooLarge { limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_predicates() {
        let short = DecodeError::insufficient(4, 1);
        assert!(short.is_insufficient_data());
        assert!(!short.is_invalid_data());

        let bad = DecodeError::InvalidData("reserved tag 0xC1".into());
        assert!(bad.is_invalid_data());
        assert!(!bad.is_insufficient_data());
    }

    #[test]
    fn display_includes_context() {
        let short = DecodeError::insufficient(8, 3);
        assert_eq!(
            short.to_string(),
            "insufficient data: need 8 bytes but only 3 remaining"
        );
    }

    #[test]
    fn stream_error_wraps_decode_error() {
        let err: StreamError = DecodeError::InvalidData("x".into()).into();
        assert!(matches!(err, StreamError::Decode(DecodeError::InvalidData(_))));
    }
}
