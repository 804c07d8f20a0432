//! Courier client library.
//!
//! Builds request frames, renders responses for a human, and carries
//! the two collaborators the relay core deliberately does not own: the
//! asymmetric-crypto engine (RSA, key components exchanged as decimal
//! text) and the durable keystore (own private key plus fetched peer
//! keys, one CBOR file).
//!
//! The relay never sees any of this; when a peer's public key is known
//! the message payload crossing the wire is ciphertext.

pub mod crypto;
pub mod error;
pub mod keystore;
pub mod render;
pub mod request;
pub mod transport;

pub use crypto::Keypair;
pub use error::ClientError;
pub use keystore::{FileKeystore, Keystore, PeerKey};
