//! Sending a share code to a waiting peer.

use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::info;

use crate::error::ShareError;

/// Write `code` to an open stream and close our half.
pub async fn send_code<S>(stream: &mut S, code: &str) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(code.as_bytes()).await?;
    stream.flush().await?;
    stream.shutdown().await
}

/// Connect to a listening peer and hand it `code`.
pub async fn connect_and_send(addr: &str, code: &str) -> Result<(), ShareError> {
    let send_err = |source| ShareError::Send {
        peer: addr.to_string(),
        source,
    };
    let mut stream = TcpStream::connect(addr).await.map_err(send_err)?;
    send_code(&mut stream, code).await.map_err(send_err)?;
    info!(peer = addr, code, "share code sent");
    Ok(())
}
