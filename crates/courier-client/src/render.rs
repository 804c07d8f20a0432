//! Human renderings of relay responses.
//!
//! Pure string building so the output is testable; `main` does the
//! printing.

use courier_proto::{KeyItem, MailboxItem};

use crate::crypto::Keypair;

/// Render drained mailbox contents.
///
/// Each payload is first offered to the own private key; a payload that
/// decrypts is shown as the recovered text, anything else (plaintext
/// messages, or ciphertext for some other key) is shown as lossy UTF-8.
pub fn mailbox(items: &[MailboxItem], has_more: bool, keypair: Option<&Keypair>) -> String {
    if items.is_empty() {
        return "no messages\n".to_owned();
    }

    let mut out = String::new();
    for item in items {
        let text = match keypair.and_then(|key| key.decrypt(&item.payload).ok()) {
            Some(plaintext) => String::from_utf8_lossy(&plaintext).into_owned(),
            None => String::from_utf8_lossy(&item.payload).into_owned(),
        };
        out.push_str("Sender Name:\n");
        out.push_str(&item.sender);
        out.push_str("\n\nMessage:\n");
        out.push_str(&text);
        out.push_str("\n\n");
    }
    if has_more {
        out.push_str("more messages available from server\n");
    }
    out
}

/// Render a fetched key list.
pub fn keys(peer: &str, items: &[KeyItem], has_more: bool) -> String {
    if items.is_empty() {
        return format!("no keys published for {peer}\n");
    }

    let mut out = format!("{} key(s) published for {peer}:\n", items.len());
    for (index, item) in items.iter().enumerate() {
        out.push_str(&format!(
            "  [{index}] e = {}, n = {} digits\n",
            item.exponent,
            item.modulus.len(),
        ));
    }
    if has_more {
        out.push_str("more keys available from server\n");
    }
    out
}
