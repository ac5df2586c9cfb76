//! Share hand-off over loopback TCP.

use agenda_core::share::{connect_and_send, receive_once, spawn_listener, ShareStatus, TcpAcceptor};
use agenda_core::ShareError;
use tokio::io::AsyncWriteExt;
use tokio::sync::oneshot;

#[tokio::test]
async fn test_code_travels_from_sender_to_listener() {
    let acceptor = TcpAcceptor::bind("127.0.0.1:0", "BluetoothApp").await.unwrap();
    let addr = acceptor.local_addr().unwrap().to_string();
    let mut handle = spawn_listener(acceptor, 1024);
    assert_eq!(handle.status.recv().await, Some(ShareStatus::Listening));

    connect_and_send(&addr, "9b2f6c1e-code").await.unwrap();

    assert_eq!(handle.status.recv().await, Some(ShareStatus::Connected));
    assert_eq!(
        handle.status.recv().await,
        Some(ShareStatus::Received("9b2f6c1e-code".into()))
    );
    assert_eq!(handle.join().await.unwrap().as_deref(), Some("9b2f6c1e-code"));
}

#[tokio::test]
async fn test_listener_stops_after_first_peer() {
    let mut acceptor = TcpAcceptor::bind("127.0.0.1:0", "BluetoothApp").await.unwrap();
    let addr = acceptor.local_addr().unwrap();
    let (_cancel_tx, cancel_rx) = oneshot::channel();

    let peer = tokio::spawn(async move {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.shutdown().await.unwrap();
    });
    let got = receive_once(&mut acceptor, 1024, None, cancel_rx).await.unwrap();
    peer.await.unwrap();
    assert_eq!(got, None);
    drop(acceptor);

    // The socket is gone once the acceptor is dropped.
    assert!(matches!(
        connect_and_send(&addr.to_string(), "late").await,
        Err(ShareError::Send { .. })
    ));
}

#[tokio::test]
async fn test_cancel_before_any_peer() {
    let acceptor = TcpAcceptor::bind("127.0.0.1:0", "BluetoothApp").await.unwrap();
    let mut handle = spawn_listener(acceptor, 1024);
    handle.cancel();
    assert!(matches!(handle.join().await, Err(ShareError::Cancelled)));
}

#[tokio::test]
async fn test_bind_conflict_is_reported() {
    let first = TcpAcceptor::bind("127.0.0.1:0", "BluetoothApp").await.unwrap();
    let addr = first.local_addr().unwrap().to_string();
    assert!(matches!(
        TcpAcceptor::bind(&addr, "BluetoothApp").await,
        Err(ShareError::Listen { .. })
    ));
}
