//! Response frames (relay → client).
//!
//! Layout: `magic(2) | kind(1) | itemCount(1) | moreFlag(1)` followed by
//! `itemCount` item records. Mailbox items (kind 3) are
//! `senderLen(1) | payloadLen(2 BE) | sender | payload`; key items
//! (kind 6) are `nameLen(1) | expLen(1) | modLen(2 BE) | name |
//! exponent | modulus`.
//!
//! `itemCount` is one byte, so 255 records is a hard ceiling per frame,
//! not a pagination cursor; `moreFlag` tells the client whether another
//! request would return more.

use bytes::{BufMut, Bytes, BytesMut};

use crate::errors::{ProtocolError, Result};
use crate::limits::{
    MAGIC, MAX_EXPONENT_LEN, MAX_ITEMS, MAX_MODULUS_LEN, MAX_NAME_LEN, MAX_PAYLOAD_LEN,
    RESPONSE_HEADER_LEN,
};
use crate::opcodes::ResponseKind;
use crate::wire::{check_len, FieldReader};

/// One drained message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxItem {
    /// Name the sender claimed when creating the message.
    pub sender: String,
    /// Opaque message bytes, exactly as stored.
    pub payload: Bytes,
}

/// One published key record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyItem {
    /// Name the key was published under.
    pub name: String,
    /// Public exponent as decimal text.
    pub exponent: String,
    /// Modulus as decimal text.
    pub modulus: String,
}

/// One decoded response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Answer to a Read request.
    Mailbox {
        /// Drained messages, oldest first.
        items: Vec<MailboxItem>,
        /// True when the mailbox still holds messages beyond this batch.
        has_more: bool,
    },
    /// Answer to a FetchKeys request.
    Keys {
        /// Key records, oldest first.
        items: Vec<KeyItem>,
        /// True when more records exist beyond the 255-item ceiling.
        has_more: bool,
    },
}

impl Response {
    /// Kind byte this response encodes to.
    pub fn kind(&self) -> ResponseKind {
        match self {
            Self::Mailbox { .. } => ResponseKind::Mailbox,
            Self::Keys { .. } => ResponseKind::Keys,
        }
    }

    /// Encode into a complete frame.
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(RESPONSE_HEADER_LEN);
        let (count, has_more) = match self {
            Self::Mailbox { items, has_more } => (items.len(), *has_more),
            Self::Keys { items, has_more } => (items.len(), *has_more),
        };
        if count > MAX_ITEMS {
            return Err(ProtocolError::TooManyItems { count });
        }
        buf.put_u16(MAGIC);
        buf.put_u8(self.kind().to_u8());
        buf.put_u8(count as u8);
        buf.put_u8(u8::from(has_more));

        match self {
            Self::Mailbox { items, .. } => {
                for item in items {
                    check_len("sender", item.sender.len(), MAX_NAME_LEN)?;
                    check_len("payload", item.payload.len(), MAX_PAYLOAD_LEN)?;
                    buf.put_u8(item.sender.len() as u8);
                    buf.put_u16(item.payload.len() as u16);
                    buf.put_slice(item.sender.as_bytes());
                    buf.put_slice(&item.payload);
                }
            }
            Self::Keys { items, .. } => {
                for item in items {
                    check_len("name", item.name.len(), MAX_NAME_LEN)?;
                    check_len("exponent", item.exponent.len(), MAX_EXPONENT_LEN)?;
                    check_len("modulus", item.modulus.len(), MAX_MODULUS_LEN)?;
                    buf.put_u8(item.name.len() as u8);
                    buf.put_u8(item.exponent.len() as u8);
                    buf.put_u16(item.modulus.len() as u16);
                    buf.put_slice(item.name.as_bytes());
                    buf.put_slice(item.exponent.as_bytes());
                    buf.put_slice(item.modulus.as_bytes());
                }
            }
        }
        Ok(buf.freeze())
    }

    /// Decode a complete frame.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut reader = FieldReader::new(buf);
        let magic = reader.take_u16()?;
        if magic != MAGIC {
            return Err(ProtocolError::BadMagic { found: magic });
        }
        let kind = ResponseKind::from_u8(reader.take_u8()?)?;
        let count = reader.take_u8()?;
        let has_more = match reader.take_u8()? {
            0 => false,
            1 => true,
            other => return Err(ProtocolError::InvalidMoreFlag(other)),
        };

        let response = match kind {
            ResponseKind::Mailbox => {
                let mut items = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    let sender_len = reader.take_u8()?;
                    let payload_len = reader.take_u16()?;
                    if sender_len == 0 {
                        return Err(ProtocolError::EmptyField { field: "sender" });
                    }
                    if payload_len == 0 {
                        return Err(ProtocolError::EmptyField { field: "payload" });
                    }
                    items.push(MailboxItem {
                        sender: reader.take_text(usize::from(sender_len), "sender")?,
                        payload: reader.take_owned(usize::from(payload_len))?,
                    });
                }
                Self::Mailbox { items, has_more }
            }
            ResponseKind::Keys => {
                let mut items = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    let name_len = reader.take_u8()?;
                    let exp_len = reader.take_u8()?;
                    let mod_len = reader.take_u16()?;
                    if name_len == 0 {
                        return Err(ProtocolError::EmptyField { field: "name" });
                    }
                    if exp_len == 0 {
                        return Err(ProtocolError::EmptyField { field: "exponent" });
                    }
                    if mod_len == 0 {
                        return Err(ProtocolError::EmptyField { field: "modulus" });
                    }
                    items.push(KeyItem {
                        name: reader.take_text(usize::from(name_len), "name")?,
                        exponent: reader.take_text(usize::from(exp_len), "exponent")?,
                        modulus: reader.take_text(usize::from(mod_len), "modulus")?,
                    });
                }
                Self::Keys { items, has_more }
            }
        };
        reader.finish()?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn empty_mailbox_wire_layout() {
        let frame = Response::Mailbox {
            items: vec![],
            has_more: false,
        }
        .encode()
        .unwrap();
        assert_eq!(&frame[..], hex!("AE73 03 00 00"));
    }

    #[test]
    fn single_message_round_trips() {
        let response = Response::Mailbox {
            items: vec![MailboxItem {
                sender: "alice".into(),
                payload: Bytes::from_static(b"hi"),
            }],
            has_more: false,
        };
        let frame = response.encode().unwrap();
        assert_eq!(Response::decode(&frame).unwrap(), response);
    }

    #[test]
    fn key_list_round_trips() {
        let response = Response::Keys {
            items: vec![
                KeyItem {
                    name: "alice".into(),
                    exponent: "65537".into(),
                    modulus: "3233".into(),
                },
                KeyItem {
                    name: "alice".into(),
                    exponent: "17".into(),
                    modulus: "7387".into(),
                },
            ],
            has_more: false,
        };
        let frame = response.encode().unwrap();
        assert_eq!(Response::decode(&frame).unwrap(), response);
    }

    #[test]
    fn more_flag_survives_the_wire() {
        let response = Response::Mailbox {
            items: vec![MailboxItem {
                sender: "a".into(),
                payload: Bytes::from_static(b"x"),
            }],
            has_more: true,
        };
        let frame = response.encode().unwrap();
        assert_eq!(frame[4], 1);
        match Response::decode(&frame).unwrap() {
            Response::Mailbox { has_more, .. } => assert!(has_more),
            Response::Keys { .. } => unreachable!("decoded wrong kind"),
        }
    }

    #[test]
    fn more_flag_outside_zero_one_is_rejected() {
        let frame = hex!("AE73 03 00 02");
        assert_eq!(
            Response::decode(&frame),
            Err(ProtocolError::InvalidMoreFlag(2))
        );
    }

    #[test]
    fn altered_magic_is_rejected() {
        let mut frame = Response::Mailbox {
            items: vec![],
            has_more: false,
        }
        .encode()
        .unwrap()
        .to_vec();
        frame[1] ^= 0x01;
        assert_eq!(
            Response::decode(&frame),
            Err(ProtocolError::BadMagic { found: 0xAE72 })
        );
    }

    #[test]
    fn declared_zero_length_item_field_is_rejected() {
        // One item declaring a zero-length sender.
        let frame = hex!("AE73 03 01 00 00 0002 6869");
        assert_eq!(
            Response::decode(&frame),
            Err(ProtocolError::EmptyField { field: "sender" })
        );
    }

    #[test]
    fn item_shorter_than_declared_is_truncation() {
        let frame = Response::Mailbox {
            items: vec![MailboxItem {
                sender: "alice".into(),
                payload: Bytes::from_static(b"hello"),
            }],
            has_more: false,
        }
        .encode()
        .unwrap();
        let err = Response::decode(&frame[..frame.len() - 3]).unwrap_err();
        assert!(err.is_truncation());
    }

    #[test]
    fn more_than_255_items_cannot_be_encoded() {
        let items = (0..256)
            .map(|i| MailboxItem {
                sender: format!("sender{i}"),
                payload: Bytes::from_static(b"x"),
            })
            .collect();
        let response = Response::Mailbox {
            items,
            has_more: true,
        };
        assert_eq!(
            response.encode(),
            Err(ProtocolError::TooManyItems { count: 256 })
        );
    }
}
