//! Request and response kind bytes.
//!
//! The original scheme assigned 1, 2, 3 and 6; kind 4 (key
//! registration) is our addition and takes the lowest free id.

use crate::errors::{ProtocolError, Result};

/// Operation requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestKind {
    /// Drain the caller's mailbox.
    Read = 1,
    /// Store a message for another client.
    Create = 2,
    /// Publish the caller's public key.
    Register = 4,
    /// Fetch the public keys published under a name.
    FetchKeys = 6,
}

impl RequestKind {
    /// Parse a kind byte from a request header.
    pub fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            1 => Ok(Self::Read),
            2 => Ok(Self::Create),
            4 => Ok(Self::Register),
            6 => Ok(Self::FetchKeys),
            other => Err(ProtocolError::UnknownRequestKind(other)),
        }
    }

    /// Wire representation.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Whether the relay answers this kind with a response frame.
    ///
    /// Create and Register are fire-and-forget: the relay stores and
    /// closes, and the client assumes success if the send did not error.
    pub fn expects_response(self) -> bool {
        matches!(self, Self::Read | Self::FetchKeys)
    }
}

/// Shape of the item records in a response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResponseKind {
    /// Drained mailbox contents.
    Mailbox = 3,
    /// Published key records.
    Keys = 6,
}

impl ResponseKind {
    /// Parse a kind byte from a response header.
    pub fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            3 => Ok(Self::Mailbox),
            6 => Ok(Self::Keys),
            other => Err(ProtocolError::UnknownResponseKind(other)),
        }
    }

    /// Wire representation.
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_kinds_round_trip() {
        for kind in [
            RequestKind::Read,
            RequestKind::Create,
            RequestKind::Register,
            RequestKind::FetchKeys,
        ] {
            assert_eq!(RequestKind::from_u8(kind.to_u8()), Ok(kind));
        }
    }

    #[test]
    fn reserved_response_kind_is_not_a_request() {
        // 3 is the mailbox response kind; it must never arrive inbound.
        assert_eq!(
            RequestKind::from_u8(3),
            Err(ProtocolError::UnknownRequestKind(3))
        );
    }

    #[test]
    fn unknown_kinds_are_rejected() {
        assert!(RequestKind::from_u8(0).is_err());
        assert!(RequestKind::from_u8(7).is_err());
        assert!(ResponseKind::from_u8(1).is_err());
        assert!(ResponseKind::from_u8(255).is_err());
    }

    #[test]
    fn only_read_and_fetch_expect_a_reply() {
        assert!(RequestKind::Read.expects_response());
        assert!(RequestKind::FetchKeys.expects_response());
        assert!(!RequestKind::Create.expects_response());
        assert!(!RequestKind::Register.expects_response());
    }
}
