//! Field-by-field reader over a known-length buffer.
//!
//! Decoders never keep a hand-rolled cursor index; they consume the
//! buffer through this reader, which accounts for every byte and
//! reports truncation with exact byte counts.

use bytes::Bytes;

use crate::errors::{ProtocolError, Result};

pub(crate) struct FieldReader<'a> {
    buf: &'a [u8],
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub(crate) fn take_u8(&mut self) -> Result<u8> {
        let bytes = self.take_bytes(1)?;
        Ok(bytes[0])
    }

    pub(crate) fn take_u16(&mut self) -> Result<u16> {
        let bytes = self.take_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn take_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.buf.len() < len {
            return Err(ProtocolError::Truncated {
                needed: len - self.buf.len(),
                available: self.buf.len(),
            });
        }
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    pub(crate) fn take_owned(&mut self, len: usize) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(self.take_bytes(len)?))
    }

    pub(crate) fn take_text(&mut self, len: usize, field: &'static str) -> Result<String> {
        let raw = self.take_bytes(len)?;
        let text = std::str::from_utf8(raw).map_err(|_| ProtocolError::InvalidText { field })?;
        Ok(text.to_owned())
    }

    /// Verify every byte was consumed.
    pub(crate) fn finish(self) -> Result<()> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::TrailingBytes {
                count: self.buf.len(),
            })
        }
    }
}

/// Check a field against its wire bounds before encoding.
///
/// `len` is the encoded byte length, which for text fields can exceed
/// the character count.
pub(crate) fn check_len(field: &'static str, len: usize, max: usize) -> Result<()> {
    if len == 0 {
        return Err(ProtocolError::EmptyField { field });
    }
    if len > max {
        return Err(ProtocolError::FieldTooLong { field, len, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_accounts_for_every_byte() {
        let mut reader = FieldReader::new(&[0x01, 0x02, 0x03]);
        assert_eq!(reader.take_u8(), Ok(0x01));
        assert_eq!(reader.take_u16(), Ok(0x0203));
        assert_eq!(reader.finish(), Ok(()));
    }

    #[test]
    fn reader_reports_exact_shortfall() {
        let mut reader = FieldReader::new(&[0x01]);
        assert_eq!(
            reader.take_bytes(4),
            Err(ProtocolError::Truncated {
                needed: 3,
                available: 1
            })
        );
    }

    #[test]
    fn reader_rejects_leftover_bytes() {
        let reader = FieldReader::new(&[0x01]);
        assert_eq!(reader.finish(), Err(ProtocolError::TrailingBytes { count: 1 }));
    }

    #[test]
    fn text_must_be_utf8() {
        let mut reader = FieldReader::new(&[0xFF, 0xFE]);
        assert_eq!(
            reader.take_text(2, "name"),
            Err(ProtocolError::InvalidText { field: "name" })
        );
    }

    #[test]
    fn bounds_check_rejects_empty_and_oversize() {
        assert!(check_len("name", 1, 255).is_ok());
        assert!(check_len("name", 255, 255).is_ok());
        assert_eq!(
            check_len("name", 0, 255),
            Err(ProtocolError::EmptyField { field: "name" })
        );
        assert_eq!(
            check_len("name", 256, 255),
            Err(ProtocolError::FieldTooLong {
                field: "name",
                len: 256,
                max: 255
            })
        );
    }
}
