//! Error types for the XDR codec.
//!
//! Encoding and decoding fail for different reasons and callers react to
//! them differently: an [`EncodeError`] means the value we were asked to
//! write is out of range for the wire format, a [`DecodeError`] means the
//! bytes we were handed are not a valid encoding. Every decode error carries
//! the byte offset it was detected at.

use thiserror::Error;

/// Errors raised while writing a value to the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// A variable-length field or array is longer than its declared maximum.
    #[error("{what} length {len} exceeds maximum {max}")]
    TooLong {
        /// Name of the offending field.
        what: &'static str,
        /// Actual length.
        len: usize,
        /// Declared maximum.
        max: usize,
    },
}

/// Errors raised while reading a value from the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input ended before the value was complete.
    #[error("unexpected end of input at byte {offset}: needed {needed} more bytes")]
    UnexpectedEof {
        /// Position of the read that ran off the end.
        offset: usize,
        /// Bytes still required.
        needed: usize,
    },

    /// Bytes remained after the top-level value was fully decoded.
    #[error("{remaining} trailing bytes after value ending at byte {offset}")]
    TrailingBytes {
        /// End of the decoded value.
        offset: usize,
        /// Number of unread bytes.
        remaining: usize,
    },

    /// A union discriminant is not one of the known arms.
    #[error("unknown {type_name} discriminant {value} at byte {offset}")]
    UnknownDiscriminant {
        /// The union being decoded.
        type_name: &'static str,
        /// The discriminant found on the wire.
        value: i32,
        /// Position of the discriminant.
        offset: usize,
    },

    /// A boolean or optional flag was neither 0 nor 1.
    #[error("invalid boolean value {value} at byte {offset}")]
    InvalidBool {
        /// The raw value read.
        value: u32,
        /// Position of the value.
        offset: usize,
    },

    /// Padding bytes after opaque data were not zero.
    #[error("non-zero padding at byte {offset}")]
    NonZeroPadding {
        /// Position of the padding.
        offset: usize,
    },

    /// A length prefix exceeds the declared maximum for the field.
    #[error("{what} length {len} exceeds maximum {max} at byte {offset}")]
    LengthExceeded {
        /// Name of the field.
        what: &'static str,
        /// Length found on the wire.
        len: usize,
        /// Declared maximum.
        max: usize,
        /// Position of the length prefix.
        offset: usize,
    },

    /// A string field does not hold valid UTF-8.
    #[error("{what} is not valid UTF-8 at byte {offset}")]
    InvalidUtf8 {
        /// Name of the field.
        what: &'static str,
        /// Position of the string data.
        offset: usize,
    },

    /// The transport encoding is not valid base64.
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
}

impl From<base64::DecodeError> for DecodeError {
    fn from(e: base64::DecodeError) -> Self {
        DecodeError::InvalidBase64(e.to_string())
    }
}
