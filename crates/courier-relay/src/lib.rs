//! Courier relay server.
//!
//! An always-on, in-memory store-and-forward relay: clients address
//! messages to other clients by name, the relay queues them, and
//! recipients drain their queue with a later read. A key registry lets
//! clients publish RSA public keys so peers can encrypt payloads end to
//! end; the relay only ever carries opaque bytes.
//!
//! # Architecture
//!
//! The two stores are process-wide singletons passed explicitly into
//! every connection handler, never reached through ambient globals.
//! Each accepted connection runs as its own task and performs exactly
//! one request/response exchange:
//!
//! ```text
//! accept ──> read frame ──> validate ──> dispatch ──> respond? ──> close
//!              (timed)       (codec)     (stores)    (Read/Keys
//!                                                     only)
//! ```
//!
//! Any failure along the way closes the connection without a response;
//! a bad connection never takes down the accept loop. There is no
//! keep-alive, no retry, and no persistence across restarts.

pub mod connection;
pub mod error;
pub mod keyring;
pub mod listener;
pub mod mailbox;

pub use connection::serve;
pub use error::RelayError;
pub use keyring::{KeyRecord, KeyRegistry};
pub use listener::run;
pub use mailbox::{Drained, MailboxStore, StoredMessage};
