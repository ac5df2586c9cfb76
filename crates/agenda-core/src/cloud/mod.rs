//! Remote REST store.
//!
//! Tasks and events are mirrored to a server keyed by a per-install device
//! UUID. Writes are best effort and carry no version or conflict metadata.

pub mod client;
pub mod codec;
pub mod identity;

pub use client::CloudClient;
pub use identity::{clear_device_id, device_id, register, set_device_id};
