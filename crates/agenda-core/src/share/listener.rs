//! One-shot receive side of the share exchange.
//!
//! Accept one connection, read one message, close everything.

use std::io;
use tokio::io::AsyncReadExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::transport::ShareAcceptor;
use crate::error::ShareError;

/// Progress reported by a running listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareStatus {
    Listening,
    Connected,
    Received(String),
    ConnectionLost,
}

fn notify(status: Option<&mpsc::UnboundedSender<ShareStatus>>, event: ShareStatus) {
    if let Some(tx) = status {
        // Nobody listening for status is fine.
        let _ = tx.send(event);
    }
}

async fn first_stream<A: ShareAcceptor>(acceptor: &mut A) -> Result<A::Stream, ShareError> {
    loop {
        match acceptor.accept().await {
            Ok(Some(stream)) => return Ok(stream),
            Ok(None) => continue,
            Err(e) => {
                error!(error = %e, "share listener failed");
                return Err(ShareError::Accept(e));
            }
        }
    }
}

/// Wait for one peer, read a single message of at most `buffer_size` bytes.
///
/// Returns `Ok(None)` when the peer closed without sending anything. A
/// `()` on `cancel` stops the wait with [`ShareError::Cancelled`]; dropping
/// the sender does not.
pub async fn receive_once<A: ShareAcceptor>(
    acceptor: &mut A,
    buffer_size: usize,
    status: Option<&mpsc::UnboundedSender<ShareStatus>>,
    cancel: oneshot::Receiver<()>,
) -> Result<Option<String>, ShareError> {
    notify(status, ShareStatus::Listening);

    let cancelled = async {
        if cancel.await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let mut stream = tokio::select! {
        () = cancelled => {
            info!("share listener cancelled");
            return Err(ShareError::Cancelled);
        }
        accepted = first_stream(acceptor) => accepted?,
    };
    notify(status, ShareStatus::Connected);

    let mut buf = vec![0u8; buffer_size.max(1)];
    let read = stream.read(&mut buf).await;
    drop(stream);
    let n = match read {
        Ok(n) => n,
        Err(e) => {
            error!(error = %e, "share connection lost");
            notify(status, ShareStatus::ConnectionLost);
            return Err(ShareError::Read(e));
        }
    };

    let message = String::from_utf8_lossy(&buf[..n]).trim().to_string();
    if message.is_empty() {
        debug!("share peer closed without a message");
        return Ok(None);
    }
    info!(code = %message, "share code received");
    notify(status, ShareStatus::Received(message.clone()));
    Ok(Some(message))
}

/// A listener running on its own task.
#[derive(Debug)]
pub struct ListenerHandle {
    pub status: mpsc::UnboundedReceiver<ShareStatus>,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<Option<String>, ShareError>>,
}

impl ListenerHandle {
    /// Ask the listener to stop. No effect once a peer has connected.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    pub async fn join(self) -> Result<Option<String>, ShareError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(ShareError::Accept(io::Error::other(e.to_string()))),
        }
    }
}

/// Run [`receive_once`] on a spawned task. Must be called within a tokio runtime.
pub fn spawn_listener<A>(mut acceptor: A, buffer_size: usize) -> ListenerHandle
where
    A: ShareAcceptor + Send + 'static,
{
    let (status_tx, status_rx) = mpsc::unbounded_channel();
    let (cancel_tx, cancel_rx) = oneshot::channel();
    let task = tokio::spawn(async move {
        receive_once(&mut acceptor, buffer_size, Some(&status_tx), cancel_rx).await
    });
    ListenerHandle {
        status: status_rx,
        cancel: Some(cancel_tx),
        task,
    }
}
