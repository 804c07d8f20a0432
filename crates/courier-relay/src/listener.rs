//! Accept loop.
//!
//! Binds to all interfaces, accepts connections forever, and serves
//! each one on its own task. The stores are shared across tasks and
//! internally synchronized; a failed exchange is logged and dropped,
//! never retried, and never stops the loop.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::connection;
use crate::error::RelayError;
use crate::keyring::KeyRegistry;
use crate::mailbox::MailboxStore;

/// Bind `port` and serve connections until the process is killed.
pub async fn run(port: u16) -> Result<(), RelayError> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "relay listening");

    let mailboxes = Arc::new(MailboxStore::new());
    let keys = Arc::new(KeyRegistry::new());

    loop {
        let (mut stream, addr) = listener.accept().await?;
        let mailboxes = Arc::clone(&mailboxes);
        let keys = Arc::clone(&keys);
        tokio::spawn(async move {
            tracing::debug!(%addr, "connection accepted");
            match connection::serve(&mut stream, &mailboxes, &keys).await {
                Ok(()) => tracing::debug!(%addr, "exchange complete"),
                Err(err) if err.is_transport() => {
                    tracing::warn!(%addr, error = %err, "connection lost");
                }
                Err(err) => tracing::warn!(%addr, error = %err, "rejected frame"),
            }
        });
    }
}
