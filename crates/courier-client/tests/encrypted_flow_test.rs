//! Full encrypted messaging flow against the real relay handler, over
//! in-memory duplex streams: register, fetch keys, create, read.
//! The relay must only ever see ciphertext.

use std::sync::Arc;

use courier_client::{render, request, Keypair, PeerKey};
use courier_proto::{Request, Response};
use courier_relay::{serve, KeyRegistry, MailboxStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

struct Relay {
    mailboxes: Arc<MailboxStore>,
    keys: Arc<KeyRegistry>,
}

impl Relay {
    fn new() -> Self {
        Self {
            mailboxes: Arc::new(MailboxStore::new()),
            keys: Arc::new(KeyRegistry::new()),
        }
    }

    async fn exchange(&self, request: &Request) -> Vec<u8> {
        let (mut client, mut server) = tokio::io::duplex(256 * 1024);
        let mailboxes = Arc::clone(&self.mailboxes);
        let keys = Arc::clone(&self.keys);
        let handler =
            tokio::spawn(async move { serve(&mut server, &mailboxes, &keys).await });

        client
            .write_all(&request.encode().unwrap())
            .await
            .unwrap();
        client.shutdown().await.unwrap();
        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        handler.await.unwrap().unwrap();
        reply
    }
}

#[tokio::test]
async fn register_fetch_create_read_round_trip() {
    let relay = Relay::new();

    // Alice registers her public key. 512 bits keeps the test fast.
    let alice = Keypair::generate_bits(512).unwrap();
    let publish = request::register("alice", &alice).unwrap();
    relay.exchange(&publish).await;

    // Bob fetches Alice's keys, as his client would before encrypting.
    let fetch = request::fetch_keys("alice").unwrap();
    let reply = relay.exchange(&fetch).await;
    let alice_key = match Response::decode(&reply).unwrap() {
        Response::Keys { items, .. } => {
            assert_eq!(items.len(), 1);
            PeerKey {
                exponent: items[0].exponent.clone(),
                modulus: items[0].modulus.clone(),
            }
        }
        other => unreachable!("expected key response, got {other:?}"),
    };

    // Bob sends an encrypted message.
    let create = request::create("bob", "alice", "meet at noon", Some(&alice_key)).unwrap();
    match &create {
        Request::Create { payload, .. } => {
            // The relay-visible payload must not be the plaintext.
            assert_ne!(&payload[..], b"meet at noon");
        }
        other => unreachable!("expected create request, got {other:?}"),
    }
    relay.exchange(&create).await;

    // Alice reads and decrypts.
    let read = request::read("alice").unwrap();
    let reply = relay.exchange(&read).await;
    match Response::decode(&reply).unwrap() {
        Response::Mailbox { items, has_more } => {
            assert_eq!(items.len(), 1);
            assert!(!has_more);
            assert_eq!(items[0].sender, "bob");
            assert_eq!(alice.decrypt(&items[0].payload).unwrap(), b"meet at noon");

            let shown = render::mailbox(&items, has_more, Some(&alice));
            assert!(shown.contains("Message:\nmeet at noon\n"));
        }
        other => unreachable!("expected mailbox response, got {other:?}"),
    }
}

#[tokio::test]
async fn plaintext_flow_works_without_any_keys() {
    let relay = Relay::new();

    let create = request::create("bob", "alice", "hello", None).unwrap();
    relay.exchange(&create).await;

    let read = request::read("alice").unwrap();
    let reply = relay.exchange(&read).await;
    match Response::decode(&reply).unwrap() {
        Response::Mailbox { items, .. } => {
            assert_eq!(&items[0].payload[..], b"hello");
            let shown = render::mailbox(&items, false, None);
            assert!(shown.contains("Message:\nhello\n"));
        }
        other => unreachable!("expected mailbox response, got {other:?}"),
    }
}
