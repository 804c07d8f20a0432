//! Per-connection exchange handling.
//!
//! One connection carries exactly one request and at most one response:
//!
//! 1. Await frame: read the 7-byte header, then exactly the declared
//!    body bytes, each read bounded by a one-second deadline. A read
//!    that does not complete in time is a transport failure, never
//!    "no data yet".
//! 2. Validate: codec decoding; any violation aborts with no response.
//! 3. Dispatch: hand the request to the mailbox store or key registry.
//! 4. Respond: Read and FetchKeys get a reply frame; Create and
//!    Register are fire-and-forget.
//! 5. Close, unconditionally.
//!
//! Dispatch is separated from I/O and returns the response as a value,
//! so the exchange logic is testable without sockets.

use std::time::Duration;

use courier_proto::limits::MAX_ITEMS;
use courier_proto::{KeyItem, MailboxItem, Request, RequestHeader, Response};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::error::RelayError;
use crate::keyring::KeyRegistry;
use crate::mailbox::MailboxStore;

/// Deadline for each socket read.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Apply a request to the stores and build the reply, if the kind has
/// one.
pub fn dispatch(
    request: Request,
    mailboxes: &MailboxStore,
    keys: &KeyRegistry,
) -> Option<Response> {
    match request {
        Request::Read { name } => {
            let drained = mailboxes.drain(&name, MAX_ITEMS);
            tracing::info!(
                client = %name,
                count = drained.items.len(),
                has_more = drained.has_more,
                "drained mailbox"
            );
            let items = drained
                .items
                .into_iter()
                .map(|message| MailboxItem {
                    sender: message.sender,
                    payload: message.payload,
                })
                .collect();
            Some(Response::Mailbox {
                items,
                has_more: drained.has_more,
            })
        }
        Request::Create {
            sender,
            recipient,
            payload,
        } => {
            tracing::info!(
                from = %sender,
                to = %recipient,
                bytes = payload.len(),
                "stored message"
            );
            mailboxes.append(&recipient, sender, payload);
            None
        }
        Request::Register {
            name,
            exponent,
            modulus,
        } => {
            tracing::info!(client = %name, "published public key");
            keys.publish(&name, exponent, modulus);
            None
        }
        Request::FetchKeys { name } => {
            let lookup = keys.lookup(&name);
            tracing::info!(client = %name, count = lookup.records.len(), "looked up keys");
            let items = lookup
                .records
                .into_iter()
                .map(|record| KeyItem {
                    name: name.clone(),
                    exponent: record.exponent,
                    modulus: record.modulus,
                })
                .collect();
            Some(Response::Keys {
                items,
                has_more: lookup.has_more,
            })
        }
    }
}

/// Serve one request/response exchange over `stream`, then return.
///
/// The caller owns the connection lifecycle; this function never
/// retries and sends at most one response. On a protocol error nothing
/// is written back.
pub async fn serve<S>(
    stream: &mut S,
    mailboxes: &MailboxStore,
    keys: &KeyRegistry,
) -> Result<(), RelayError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut fixed = [0u8; RequestHeader::LEN];
    read_exact_timed(stream, &mut fixed, "request header").await?;
    let header = RequestHeader::decode(&fixed)?;

    let mut body = vec![0u8; header.body_len()];
    read_exact_timed(stream, &mut body, "request body").await?;
    let request = Request::decode_body(&header, &body)?;

    if let Some(response) = dispatch(request, mailboxes, keys) {
        let frame = response.encode()?;
        stream.write_all(&frame).await?;
        stream.flush().await?;
    }
    stream.shutdown().await?;
    Ok(())
}

async fn read_exact_timed<S>(
    stream: &mut S,
    buf: &mut [u8],
    what: &'static str,
) -> Result<(), RelayError>
where
    S: AsyncRead + Unpin,
{
    match timeout(READ_TIMEOUT, stream.read_exact(buf)).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(err)) => Err(RelayError::Io(err)),
        Err(_) => Err(RelayError::Timeout(what)),
    }
}
