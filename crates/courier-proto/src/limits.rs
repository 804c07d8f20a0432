//! Protocol constants and field bounds.
//!
//! The bounds follow directly from the header layout: one-byte length
//! prefixes cap names and exponent text at 255 bytes, two-byte prefixes
//! cap payloads and modulus text at 65535 bytes, and the one-byte item
//! counter caps a response at 255 records. Values outside these ranges
//! are rejected at encode time rather than silently truncated.

/// Magic constant opening every frame, transmitted big-endian.
pub const MAGIC: u16 = 0xAE73;

/// Fixed request header: magic(2) kind(1) nameLen(1) field2Len(1) field3Len(2).
pub const REQUEST_HEADER_LEN: usize = 7;

/// Fixed response header: magic(2) kind(1) itemCount(1) moreFlag(1).
pub const RESPONSE_HEADER_LEN: usize = 5;

/// Client names: 1–255 bytes of UTF-8.
pub const MAX_NAME_LEN: usize = 255;

/// Message payloads: 1–65535 opaque bytes.
pub const MAX_PAYLOAD_LEN: usize = 65535;

/// Public exponent as decimal text: 1–255 bytes.
pub const MAX_EXPONENT_LEN: usize = 255;

/// Modulus as decimal text: 1–65535 bytes.
pub const MAX_MODULUS_LEN: usize = 65535;

/// Hard ceiling on records per response frame (one-byte item counter).
pub const MAX_ITEMS: usize = 255;
