//! Request frames (client → relay).
//!
//! Layout: `magic(2) | kind(1) | nameLen(1) | field2Len(1) |
//! field3Len(2 BE) | name | field2 | field3`.
//!
//! The meaning of field2/field3 depends on the kind: for Create they
//! are the recipient name and the message payload, for Register the
//! public exponent and modulus as decimal text, and for Read/FetchKeys
//! they must be absent. The header is decodable on its own so a server
//! can read 7 bytes, learn the body length, and then read exactly that
//! many more.

use bytes::{BufMut, Bytes, BytesMut};

use crate::errors::{ProtocolError, Result};
use crate::limits::{
    MAGIC, MAX_EXPONENT_LEN, MAX_MODULUS_LEN, MAX_NAME_LEN, MAX_PAYLOAD_LEN, REQUEST_HEADER_LEN,
};
use crate::opcodes::RequestKind;
use crate::wire::{check_len, FieldReader};

/// The fixed 7-byte request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestHeader {
    /// Operation selector.
    pub kind: RequestKind,
    /// Length of the claimed client name.
    pub name_len: u8,
    /// Length of the second field (recipient or exponent).
    pub field2_len: u8,
    /// Length of the third field (payload or modulus).
    pub field3_len: u16,
}

impl RequestHeader {
    /// Size of the fixed header on the wire.
    pub const LEN: usize = REQUEST_HEADER_LEN;

    /// Decode and validate the fixed header.
    ///
    /// Checks the magic, the kind byte, and the per-kind length rules;
    /// the body itself is checked by [`Request::decode_body`].
    pub fn decode(bytes: &[u8; Self::LEN]) -> Result<Self> {
        let mut reader = FieldReader::new(bytes);
        let magic = reader.take_u16()?;
        if magic != MAGIC {
            return Err(ProtocolError::BadMagic { found: magic });
        }
        let kind = RequestKind::from_u8(reader.take_u8()?)?;
        let header = Self {
            kind,
            name_len: reader.take_u8()?,
            field2_len: reader.take_u8()?,
            field3_len: reader.take_u16()?,
        };
        header.validate_lengths()?;
        Ok(header)
    }

    /// Number of body bytes the header declares.
    pub fn body_len(&self) -> usize {
        usize::from(self.name_len) + usize::from(self.field2_len) + usize::from(self.field3_len)
    }

    // Declared-length rules per kind, checked before any body byte is
    // interpreted.
    fn validate_lengths(&self) -> Result<()> {
        if self.name_len == 0 {
            return Err(ProtocolError::EmptyField { field: "name" });
        }
        match self.kind {
            RequestKind::Read | RequestKind::FetchKeys => {
                if self.field2_len != 0 {
                    return Err(ProtocolError::FieldNotEmpty { field: "field2" });
                }
                if self.field3_len != 0 {
                    return Err(ProtocolError::FieldNotEmpty { field: "field3" });
                }
            }
            RequestKind::Create => {
                if self.field2_len == 0 {
                    return Err(ProtocolError::EmptyField { field: "recipient" });
                }
                if self.field3_len == 0 {
                    return Err(ProtocolError::EmptyField { field: "payload" });
                }
            }
            RequestKind::Register => {
                if self.field2_len == 0 {
                    return Err(ProtocolError::EmptyField { field: "exponent" });
                }
                if self.field3_len == 0 {
                    return Err(ProtocolError::EmptyField { field: "modulus" });
                }
            }
        }
        Ok(())
    }
}

/// One decoded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Drain the mailbox of `name`.
    Read {
        /// Claimed client name.
        name: String,
    },
    /// Store `payload` for `recipient`, attributed to `sender`.
    Create {
        /// Claimed sender name.
        sender: String,
        /// Recipient mailbox name.
        recipient: String,
        /// Opaque message bytes (ciphertext in the encrypted variant).
        payload: Bytes,
    },
    /// Publish a public key under `name`.
    Register {
        /// Claimed client name.
        name: String,
        /// Public exponent as decimal text.
        exponent: String,
        /// Modulus as decimal text.
        modulus: String,
    },
    /// Fetch the key records published under `name`.
    FetchKeys {
        /// Name to look up.
        name: String,
    },
}

impl Request {
    /// Kind byte this request encodes to.
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Read { .. } => RequestKind::Read,
            Self::Create { .. } => RequestKind::Create,
            Self::Register { .. } => RequestKind::Register,
            Self::FetchKeys { .. } => RequestKind::FetchKeys,
        }
    }

    /// Encode into a complete frame.
    ///
    /// All length prefixes are computed from the fields themselves;
    /// out-of-range fields are rejected rather than truncated.
    pub fn encode(&self) -> Result<Bytes> {
        let (name, field2, field3): (&[u8], &[u8], &[u8]) = match self {
            Self::Read { name } | Self::FetchKeys { name } => {
                check_len("name", name.len(), MAX_NAME_LEN)?;
                (name.as_bytes(), &[], &[])
            }
            Self::Create {
                sender,
                recipient,
                payload,
            } => {
                check_len("name", sender.len(), MAX_NAME_LEN)?;
                check_len("recipient", recipient.len(), MAX_NAME_LEN)?;
                check_len("payload", payload.len(), MAX_PAYLOAD_LEN)?;
                (sender.as_bytes(), recipient.as_bytes(), payload)
            }
            Self::Register {
                name,
                exponent,
                modulus,
            } => {
                check_len("name", name.len(), MAX_NAME_LEN)?;
                check_len("exponent", exponent.len(), MAX_EXPONENT_LEN)?;
                check_len("modulus", modulus.len(), MAX_MODULUS_LEN)?;
                (name.as_bytes(), exponent.as_bytes(), modulus.as_bytes())
            }
        };

        let mut buf =
            BytesMut::with_capacity(RequestHeader::LEN + name.len() + field2.len() + field3.len());
        buf.put_u16(MAGIC);
        buf.put_u8(self.kind().to_u8());
        buf.put_u8(name.len() as u8);
        buf.put_u8(field2.len() as u8);
        buf.put_u16(field3.len() as u16);
        buf.put_slice(name);
        buf.put_slice(field2);
        buf.put_slice(field3);
        Ok(buf.freeze())
    }

    /// Decode a complete frame (header and body in one buffer).
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < RequestHeader::LEN {
            return Err(ProtocolError::Truncated {
                needed: RequestHeader::LEN - buf.len(),
                available: buf.len(),
            });
        }
        let mut fixed = [0u8; RequestHeader::LEN];
        fixed.copy_from_slice(&buf[..RequestHeader::LEN]);
        let header = RequestHeader::decode(&fixed)?;
        Self::decode_body(&header, &buf[RequestHeader::LEN..])
    }

    /// Decode the body that follows an already-validated header.
    ///
    /// The body must contain exactly the declared bytes: fewer is
    /// [`ProtocolError::Truncated`], more is
    /// [`ProtocolError::TrailingBytes`].
    pub fn decode_body(header: &RequestHeader, body: &[u8]) -> Result<Self> {
        let mut reader = FieldReader::new(body);
        let name = reader.take_text(usize::from(header.name_len), "name")?;
        let request = match header.kind {
            RequestKind::Read => Self::Read { name },
            RequestKind::FetchKeys => Self::FetchKeys { name },
            RequestKind::Create => Self::Create {
                sender: name,
                recipient: reader.take_text(usize::from(header.field2_len), "recipient")?,
                payload: reader.take_owned(usize::from(header.field3_len))?,
            },
            RequestKind::Register => Self::Register {
                name,
                exponent: reader.take_text(usize::from(header.field2_len), "exponent")?,
                modulus: reader.take_text(usize::from(header.field3_len), "modulus")?,
            },
        };
        reader.finish()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn read_request_wire_layout() {
        let frame = Request::Read {
            name: "bob".into(),
        }
        .encode()
        .unwrap();
        assert_eq!(&frame[..], hex!("AE73 01 03 00 0000 626F62"));
    }

    #[test]
    fn create_request_round_trips() {
        let request = Request::Create {
            sender: "alice".into(),
            recipient: "bob".into(),
            payload: Bytes::from_static(b"hi"),
        };
        let frame = request.encode().unwrap();
        assert_eq!(Request::decode(&frame).unwrap(), request);
    }

    #[test]
    fn register_request_round_trips() {
        let request = Request::Register {
            name: "alice".into(),
            exponent: "65537".into(),
            modulus: "3233".into(),
        };
        let frame = request.encode().unwrap();
        assert_eq!(Request::decode(&frame).unwrap(), request);
    }

    #[test]
    fn bad_magic_is_rejected_before_anything_else() {
        let mut frame = Request::Read {
            name: "bob".into(),
        }
        .encode()
        .unwrap()
        .to_vec();
        frame[0] = 0xAE;
        frame[1] = 0x74;
        // The kind byte is also clobbered; magic must win.
        frame[2] = 0xFF;
        assert_eq!(
            Request::decode(&frame),
            Err(ProtocolError::BadMagic { found: 0xAE74 })
        );
    }

    #[test]
    fn read_with_nonempty_payload_length_is_rejected() {
        // Read declares field3Len = 2.
        let frame = hex!("AE73 01 03 00 0002 626F62 6869");
        assert_eq!(
            Request::decode(&frame),
            Err(ProtocolError::FieldNotEmpty { field: "field3" })
        );
    }

    #[test]
    fn create_with_empty_recipient_is_rejected() {
        let frame = hex!("AE73 02 03 00 0002 626F62 6869");
        assert_eq!(
            Request::decode(&frame),
            Err(ProtocolError::EmptyField { field: "recipient" })
        );
    }

    #[test]
    fn short_body_is_truncation_not_malformed() {
        let frame = Request::Create {
            sender: "alice".into(),
            recipient: "bob".into(),
            payload: Bytes::from_static(b"hello"),
        }
        .encode()
        .unwrap();
        let err = Request::decode(&frame[..frame.len() - 2]).unwrap_err();
        assert!(err.is_truncation());
    }

    #[test]
    fn surplus_body_bytes_are_a_protocol_error() {
        let mut frame = Request::Read {
            name: "bob".into(),
        }
        .encode()
        .unwrap()
        .to_vec();
        frame.push(0x00);
        assert_eq!(
            Request::decode(&frame),
            Err(ProtocolError::TrailingBytes { count: 1 })
        );
    }

    #[test]
    fn non_utf8_name_is_rejected() {
        let frame = hex!("AE73 01 02 00 0000 FFFE");
        assert_eq!(
            Request::decode(&frame),
            Err(ProtocolError::InvalidText { field: "name" })
        );
    }

    #[test]
    fn boundary_lengths_are_accepted() {
        let request = Request::Create {
            sender: "s".repeat(255),
            recipient: "r".repeat(255),
            payload: Bytes::from(vec![0xAB; 65535]),
        };
        let frame = request.encode().unwrap();
        assert_eq!(frame.len(), 7 + 255 + 255 + 65535);
        assert_eq!(Request::decode(&frame).unwrap(), request);
    }

    #[test]
    fn oversize_fields_are_rejected_at_encode_time() {
        let request = Request::Create {
            sender: "s".repeat(256),
            recipient: "r".into(),
            payload: Bytes::from_static(b"x"),
        };
        assert_eq!(
            request.encode(),
            Err(ProtocolError::FieldTooLong {
                field: "name",
                len: 256,
                max: 255
            })
        );

        let request = Request::Create {
            sender: "s".into(),
            recipient: "r".into(),
            payload: Bytes::from(vec![0; 65536]),
        };
        assert_eq!(
            request.encode(),
            Err(ProtocolError::FieldTooLong {
                field: "payload",
                len: 65536,
                max: 65535
            })
        );
    }

    #[test]
    fn empty_payload_is_rejected_at_encode_time() {
        let request = Request::Create {
            sender: "alice".into(),
            recipient: "bob".into(),
            payload: Bytes::new(),
        };
        assert_eq!(
            request.encode(),
            Err(ProtocolError::EmptyField { field: "payload" })
        );
    }

    #[test]
    fn header_body_len_matches_encoded_size() {
        let frame = Request::Register {
            name: "alice".into(),
            exponent: "65537".into(),
            modulus: "3233".into(),
        }
        .encode()
        .unwrap();
        let mut fixed = [0u8; RequestHeader::LEN];
        fixed.copy_from_slice(&frame[..RequestHeader::LEN]);
        let header = RequestHeader::decode(&fixed).unwrap();
        assert_eq!(header.body_len(), frame.len() - RequestHeader::LEN);
    }
}
