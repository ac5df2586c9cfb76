//! Glue between the local store and the cloud.

pub mod push;
pub mod repository;

pub use push::{PushHandle, PushOutcome, SkipReason, WriteResult};
pub use repository::Repository;
