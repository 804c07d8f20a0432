//! Codec error types.

use thiserror::Error;

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Everything that can go wrong while encoding or decoding a frame.
///
/// [`ProtocolError::Truncated`] is transport-class: the bytes seen so
/// far are consistent with a valid frame that has not fully arrived.
/// Every other variant means the frame can never become valid and the
/// connection should be dropped without a response.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame did not open with the `0xAE73` magic constant.
    #[error("bad magic number 0x{found:04X}")]
    BadMagic {
        /// The two bytes actually seen.
        found: u16,
    },

    /// Request kind byte is not one the relay understands.
    #[error("unknown request kind {0}")]
    UnknownRequestKind(u8),

    /// Response kind byte is not one a client understands.
    #[error("unknown response kind {0}")]
    UnknownResponseKind(u8),

    /// Response moreFlag byte was outside {0, 1}.
    #[error("moreFlag must be 0 or 1, got {0}")]
    InvalidMoreFlag(u8),

    /// A field that must be non-empty declared length zero.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A field that must be empty for this kind declared a length.
    #[error("{field} must be empty for this request kind")]
    FieldNotEmpty {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A field exceeds what its length prefix can express.
    #[error("{field} is {len} bytes, limit is {max}")]
    FieldTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Actual byte length.
        len: usize,
        /// Maximum the wire format can carry.
        max: usize,
    },

    /// More records than the one-byte item counter can express.
    #[error("{count} items exceed the 255-item response ceiling")]
    TooManyItems {
        /// Number of records offered.
        count: usize,
    },

    /// Buffer ended before the declared lengths were satisfied.
    ///
    /// A short read, not a malformed frame; the transport layer may
    /// treat it as a connection-level failure.
    #[error("frame truncated: needed {needed} more bytes, {available} available")]
    Truncated {
        /// Bytes the current field still requires.
        needed: usize,
        /// Bytes actually remaining in the buffer.
        available: usize,
    },

    /// Bytes remained after all declared fields were consumed.
    #[error("{count} trailing bytes after frame end")]
    TrailingBytes {
        /// Number of surplus bytes.
        count: usize,
    },

    /// A text field did not decode as UTF-8.
    #[error("{field} is not valid UTF-8")]
    InvalidText {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl ProtocolError {
    /// True when the error indicates an incomplete buffer rather than a
    /// protocol violation.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}
