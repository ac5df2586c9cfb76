//! Peer-to-peer hand-off of a shared event code.
//!
//! The sender publishes an event to the cloud, then writes its code to a
//! waiting receiver over a stream transport. The receiver accepts exactly
//! one connection, reads once and looks the code up.

pub mod listener;
pub mod sender;
pub mod transport;

pub use listener::{receive_once, spawn_listener, ListenerHandle, ShareStatus};
pub use sender::{connect_and_send, send_code};
pub use transport::{ShareAcceptor, TcpAcceptor};

/// Serial-port profile UUID identifying the share service record.
pub const SERVICE_UUID: &str = "00001101-0000-1000-8000-00805F9B34FB";

/// Default service name advertised by the listener.
pub const DEFAULT_SERVICE_NAME: &str = "BluetoothApp";
