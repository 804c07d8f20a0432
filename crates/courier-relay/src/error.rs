//! Relay error types.

use courier_proto::ProtocolError;
use thiserror::Error;

/// Failures a single connection can produce.
///
/// All of these are terminal for the connection that raised them; none
/// are retried and none stop the accept loop.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The peer sent a frame the codec rejected.
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    /// The socket failed mid-exchange (reset, refused, short read).
    #[error("transport failure: {0}")]
    Io(#[from] std::io::Error),

    /// The peer did not deliver the expected bytes within the deadline.
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
}

impl RelayError {
    /// True for transport-class failures (connection trouble rather
    /// than a malformed frame).
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Io(_) | Self::Timeout(_) => true,
            Self::Protocol(err) => err.is_truncation(),
        }
    }
}
