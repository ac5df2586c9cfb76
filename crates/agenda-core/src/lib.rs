//! # Agenda Core Library
//!
//! Local task and calendar storage with best-effort cloud mirroring and a
//! one-shot peer hand-off for sharing events.
//!
//! ## Architecture
//!
//! - **Storage**: SQLite tables for tasks, events and preferences, plus a
//!   TOML configuration file
//! - **Cloud**: async REST client keyed by a per-install device UUID
//! - **Sync**: [`Repository`] writes locally first, then pushes remotely in
//!   the background
//! - **Share**: accept one connection, read one code, fetch the event
//!
//! ## Key Components
//!
//! - [`Database`]: task, event and preference persistence
//! - [`Config`]: application configuration management
//! - [`CloudClient`]: remote store client
//! - [`Repository`]: local-first writes with a [`PushHandle`] per push

pub mod cloud;
pub mod error;
pub mod model;
pub mod share;
pub mod storage;
pub mod sync;

pub use cloud::CloudClient;
pub use error::{CloudError, ConfigError, CoreError, DatabaseError, ShareError, ValidationError};
pub use model::{Category, Event, Priority, Task};
pub use share::{ShareStatus, TcpAcceptor};
pub use storage::{Config, Database};
pub use sync::{PushHandle, PushOutcome, Repository, WriteResult};
