//! Append-only public key registry.
//!
//! Maps a client name to the key records published under it. Records
//! are opaque decimal-text blobs to the registry; no cryptographic
//! validation happens here, and there is no replace or delete. Any
//! client may publish under any name.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use courier_proto::limits::MAX_ITEMS;

/// One published public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    /// Public exponent as decimal text.
    pub exponent: String,
    /// Modulus as decimal text.
    pub modulus: String,
}

/// Result of a lookup: the records plus a ceiling indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLookup {
    /// Records published under the name, oldest first.
    pub records: Vec<KeyRecord>,
    /// True when records beyond the 255-item response ceiling exist.
    pub has_more: bool,
}

/// All published keys, keyed by owner name.
#[derive(Debug, Default)]
pub struct KeyRegistry {
    inner: Mutex<HashMap<String, Vec<KeyRecord>>>,
}

impl KeyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key record under `name`. Duplicates are kept.
    pub fn publish(&self, name: &str, exponent: String, modulus: String) {
        let mut keys = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        keys.entry(name.to_owned())
            .or_default()
            .push(KeyRecord { exponent, modulus });
    }

    /// Return the records published under `name`, oldest first, capped
    /// at the response ceiling. Unknown names yield an empty result.
    pub fn lookup(&self, name: &str) -> KeyLookup {
        let keys = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(records) = keys.get(name) else {
            return KeyLookup {
                records: Vec::new(),
                has_more: false,
            };
        };
        KeyLookup {
            records: records.iter().take(MAX_ITEMS).cloned().collect(),
            has_more: records.len() > MAX_ITEMS,
        }
    }
}
