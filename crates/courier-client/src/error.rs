//! Client error types.

use courier_proto::ProtocolError;
use thiserror::Error;

/// Everything a client operation can fail with.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay sent a frame the codec rejected (or none at all).
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    /// Socket-level failure: refused, reset, closed early.
    #[error("transport failure: {0}")]
    Io(#[from] std::io::Error),

    /// The relay did not deliver within the deadline.
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),

    /// The relay answered a request of one kind with a response of
    /// another.
    #[error("unexpected response kind for this request")]
    UnexpectedResponse,

    /// Keypair generation, encryption, or decryption failed.
    #[error("crypto failure: {0}")]
    Crypto(#[from] rsa::Error),

    /// A key component was not parseable decimal text.
    #[error("{field} is not decimal text")]
    BadKeyText {
        /// Which component was malformed.
        field: &'static str,
    },

    /// Keystore file could not be written.
    #[error("keystore write failed: {0}")]
    KeystoreWrite(#[from] ciborium::ser::Error<std::io::Error>),

    /// Keystore file could not be parsed.
    #[error("keystore read failed: {0}")]
    KeystoreRead(#[from] ciborium::de::Error<std::io::Error>),

    /// User-supplied text violates a wire bound.
    #[error("{field} must be 1-{max} bytes, got {len}")]
    InvalidInput {
        /// Which input was out of range.
        field: &'static str,
        /// Encoded byte length supplied.
        len: usize,
        /// Maximum the wire format allows.
        max: usize,
    },
}
