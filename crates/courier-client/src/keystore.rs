//! Durable key storage.
//!
//! One CBOR file holds the client's own private key components and
//! every peer public key fetched from the relay, keyed by peer name.
//! The file is rewritten whole on save; there is no locking, the
//! client is a one-shot process.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::{Keypair, KeypairRecord};
use crate::error::ClientError;

/// One peer public key as fetched from the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerKey {
    /// Public exponent as decimal text.
    pub exponent: String,
    /// Modulus as decimal text.
    pub modulus: String,
}

/// In-memory keystore contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Keystore {
    own: Option<KeypairRecord>,
    peers: BTreeMap<String, Vec<PeerKey>>,
}

impl Keystore {
    /// The stored own keypair, if one was ever generated.
    pub fn own_keypair(&self) -> Result<Option<Keypair>, ClientError> {
        self.own
            .as_ref()
            .map(Keypair::from_record)
            .transpose()
    }

    /// Store the own keypair, replacing any previous one.
    pub fn set_own_keypair(&mut self, keypair: &Keypair) {
        self.own = Some(keypair.to_record());
    }

    /// Replace the stored keys for `peer` with a freshly fetched list.
    pub fn set_peer_keys(&mut self, peer: &str, keys: Vec<PeerKey>) {
        if keys.is_empty() {
            self.peers.remove(peer);
        } else {
            self.peers.insert(peer.to_owned(), keys);
        }
    }

    /// Newest known key for `peer`, the one new messages encrypt to.
    pub fn newest_peer_key(&self, peer: &str) -> Option<&PeerKey> {
        self.peers.get(peer).and_then(|keys| keys.last())
    }

    /// All known keys for `peer`, oldest first.
    pub fn peer_keys(&self, peer: &str) -> &[PeerKey] {
        self.peers.get(peer).map_or(&[], Vec::as_slice)
    }
}

/// File-backed keystore.
#[derive(Debug, Clone)]
pub struct FileKeystore {
    path: PathBuf,
}

impl FileKeystore {
    /// Use `path` as the backing file. Nothing is read until
    /// [`FileKeystore::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the keystore; a missing file is an empty keystore.
    pub fn load(&self) -> Result<Keystore, ClientError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Keystore::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(ciborium::de::from_reader(BufReader::new(file))?)
    }

    /// Write the keystore, replacing the previous contents.
    pub fn save(&self, keystore: &Keystore) -> Result<(), ClientError> {
        let file = File::create(&self.path)?;
        ciborium::ser::into_writer(keystore, file)?;
        Ok(())
    }
}
