//! Stream transports for the share exchange.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use tokio::io::AsyncRead;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::error::ShareError;

/// Source of inbound share connections.
///
/// `Ok(None)` means "nothing usable this time, try again"; an `Err` ends
/// the listener.
pub trait ShareAcceptor {
    type Stream: AsyncRead + Unpin + Send;

    fn accept(&mut self) -> impl Future<Output = io::Result<Option<Self::Stream>>> + Send;
}

/// Listens for share peers on a TCP socket.
#[derive(Debug)]
pub struct TcpAcceptor {
    listener: TcpListener,
    service_name: String,
}

impl TcpAcceptor {
    /// Bind the listening socket and advertise `service_name` in the logs.
    pub async fn bind(addr: &str, service_name: &str) -> Result<Self, ShareError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ShareError::Listen {
                addr: addr.to_string(),
                source,
            })?;
        info!(
            service = service_name,
            uuid = super::SERVICE_UUID,
            addr = %listener.local_addr().map_or_else(|_| addr.to_string(), |a| a.to_string()),
            "share service listening"
        );
        Ok(Self {
            listener,
            service_name: service_name.to_string(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl ShareAcceptor for TcpAcceptor {
    type Stream = TcpStream;

    async fn accept(&mut self) -> io::Result<Option<TcpStream>> {
        match self.listener.accept().await {
            Ok((stream, peer)) => {
                debug!(%peer, "share peer connected");
                Ok(Some(stream))
            }
            // The peer went away between SYN and accept; keep listening.
            Err(e) if matches!(
                e.kind(),
                io::ErrorKind::ConnectionAborted | io::ErrorKind::ConnectionReset
            ) =>
            {
                warn!(error = %e, "dropped half-open share connection");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
