//! Wire format for the Courier message relay protocol.
//!
//! Every frame starts with the 2-byte magic constant `0xAE73`. Requests
//! carry a 7-byte fixed header followed by up to three variable-length
//! fields; responses carry a 5-byte fixed header followed by repeated
//! item records. All multi-byte lengths are big-endian.
//!
//! The codec is pure: it consumes and produces complete byte buffers and
//! performs no I/O. Encoders derive every length prefix from the data
//! they are given, so a caller can never produce a frame whose declared
//! lengths disagree with its contents. Decoders distinguish a buffer
//! that is merely incomplete ([`ProtocolError::Truncated`], a transport
//! concern) from one that is malformed, so the transport layer can tell
//! a short read apart from a protocol violation.

pub mod errors;
pub mod limits;
pub mod opcodes;
pub mod request;
pub mod response;
mod wire;

pub use errors::{ProtocolError, Result};
pub use opcodes::{RequestKind, ResponseKind};
pub use request::{Request, RequestHeader};
pub use response::{KeyItem, MailboxItem, Response};
