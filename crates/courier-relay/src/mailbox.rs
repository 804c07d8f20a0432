//! Per-recipient FIFO message queues.
//!
//! Mailboxes are created lazily on the first message addressed to a
//! name and live for the process lifetime. A recipient with no mailbox
//! behaves identically to one with an empty queue. Reads are
//! destructive: a message handed out by [`MailboxStore::drain`] is gone
//! from the store.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use bytes::Bytes;
use courier_proto::limits::MAX_ITEMS;

/// One queued message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// Name the sender claimed. Unauthenticated by design.
    pub sender: String,
    /// Opaque payload, stored byte-for-byte.
    pub payload: Bytes,
}

/// Result of a drain: the removed batch plus a backlog indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drained {
    /// Removed messages, oldest first.
    pub items: Vec<StoredMessage>,
    /// True when messages remain beyond this batch.
    pub has_more: bool,
}

/// All mailboxes, keyed by recipient name.
///
/// Internally synchronized: one mutex guards the whole map so that
/// `drain`'s count-and-remove is atomic with respect to concurrent
/// `append` and `drain` on the same recipient. Critical sections never
/// cross an await point.
#[derive(Debug, Default)]
pub struct MailboxStore {
    inner: Mutex<HashMap<String, VecDeque<StoredMessage>>>,
}

impl MailboxStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `payload` from `sender` for `recipient`.
    ///
    /// Creates the recipient's mailbox if absent. Input is assumed
    /// already length-checked by the codec; appending never fails.
    pub fn append(&self, recipient: &str, sender: String, payload: Bytes) {
        let mut boxes = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        boxes
            .entry(recipient.to_owned())
            .or_default()
            .push_back(StoredMessage { sender, payload });
    }

    /// Remove and return up to `limit` messages for `recipient`, oldest
    /// first.
    ///
    /// `limit` is clamped to the 255-item response ceiling. An unknown
    /// recipient yields an empty batch, not an error. Exactly the
    /// returned messages are removed, atomically.
    pub fn drain(&self, recipient: &str, limit: usize) -> Drained {
        let limit = limit.min(MAX_ITEMS);
        let mut boxes = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(queue) = boxes.get_mut(recipient) else {
            return Drained {
                items: Vec::new(),
                has_more: false,
            };
        };
        let batch = limit.min(queue.len());
        let items: Vec<StoredMessage> = queue.drain(..batch).collect();
        Drained {
            items,
            has_more: !queue.is_empty(),
        }
    }

    /// Number of messages currently queued for `recipient`.
    pub fn backlog(&self, recipient: &str) -> usize {
        let boxes = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        boxes.get(recipient).map_or(0, VecDeque::len)
    }
}
