//! One-shot exchange transport.
//!
//! The protocol is strictly one request, at most one response, then
//! close. The relay shuts its half down after replying, so the reply is
//! simply "everything until EOF". Every phase carries its own deadline;
//! nothing is ever retried here.

use std::time::Duration;

use courier_proto::Request;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::ClientError;

/// Deadline for connect, send, and reply phases individually.
pub const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(1);

/// Perform one exchange with the relay.
///
/// Returns the raw reply bytes for kinds that expect one, `None` for
/// fire-and-forget kinds (the relay assumes success if the send did not
/// error, and so do we).
pub async fn exchange(
    host: &str,
    port: u16,
    request: &Request,
) -> Result<Option<Vec<u8>>, ClientError> {
    let frame = request.encode()?;

    let mut stream = timeout(EXCHANGE_TIMEOUT, TcpStream::connect((host, port)))
        .await
        .map_err(|_| ClientError::Timeout("connect"))??;
    tracing::debug!(%host, port, kind = ?request.kind(), "connected");

    timeout(EXCHANGE_TIMEOUT, stream.write_all(&frame))
        .await
        .map_err(|_| ClientError::Timeout("send"))??;

    if !request.kind().expects_response() {
        stream.shutdown().await?;
        return Ok(None);
    }

    let mut reply = Vec::new();
    timeout(EXCHANGE_TIMEOUT, stream.read_to_end(&mut reply))
        .await
        .map_err(|_| ClientError::Timeout("response"))??;
    tracing::debug!(bytes = reply.len(), "reply received");
    Ok(Some(reply))
}
