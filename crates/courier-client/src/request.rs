//! Outbound request builders.
//!
//! Thin layer over the codec that applies the wire bounds to
//! user-supplied text up front, so a typo is reported as "name must be
//! 1-255 bytes" before any socket is opened, and that decides whether a
//! message goes out as plaintext or ciphertext.

use bytes::Bytes;
use courier_proto::limits::{MAX_NAME_LEN, MAX_PAYLOAD_LEN};
use courier_proto::Request;

use crate::crypto::{self, Keypair};
use crate::error::ClientError;
use crate::keystore::PeerKey;

fn check_input(field: &'static str, text: &str, max: usize) -> Result<(), ClientError> {
    let len = text.len();
    if len == 0 || len > max {
        return Err(ClientError::InvalidInput { field, len, max });
    }
    Ok(())
}

/// Build a read request draining `name`'s mailbox.
pub fn read(name: &str) -> Result<Request, ClientError> {
    check_input("name", name, MAX_NAME_LEN)?;
    Ok(Request::Read { name: name.into() })
}

/// Build a key lookup request for `peer`.
pub fn fetch_keys(peer: &str) -> Result<Request, ClientError> {
    check_input("name", peer, MAX_NAME_LEN)?;
    Ok(Request::FetchKeys { name: peer.into() })
}

/// Build a registration request publishing `keypair`'s public half
/// under `name`.
pub fn register(name: &str, keypair: &Keypair) -> Result<Request, ClientError> {
    check_input("name", name, MAX_NAME_LEN)?;
    let (exponent, modulus) = keypair.public_components();
    Ok(Request::Register {
        name: name.into(),
        exponent,
        modulus,
    })
}

/// Build a create request carrying `message` from `sender` to
/// `recipient`.
///
/// When `peer_key` is known the payload is encrypted to it and the
/// relay only ever sees ciphertext; otherwise the message travels as
/// plaintext, the original protocol's baseline.
pub fn create(
    sender: &str,
    recipient: &str,
    message: &str,
    peer_key: Option<&PeerKey>,
) -> Result<Request, ClientError> {
    check_input("name", sender, MAX_NAME_LEN)?;
    check_input("recipient", recipient, MAX_NAME_LEN)?;
    check_input("message", message, MAX_PAYLOAD_LEN)?;

    let payload = match peer_key {
        Some(key) => {
            tracing::debug!(%recipient, "encrypting to published key");
            Bytes::from(crypto::encrypt_for(
                &key.exponent,
                &key.modulus,
                message.as_bytes(),
            )?)
        }
        None => {
            tracing::debug!(%recipient, "no published key, sending plaintext");
            Bytes::copy_from_slice(message.as_bytes())
        }
    };
    Ok(Request::Create {
        sender: sender.into(),
        recipient: recipient.into(),
        payload,
    })
}
