//! Subcommand implementations.

pub mod cloud;
pub mod config;
pub mod event;
pub mod logging;
pub mod share;
pub mod task;

use agenda_core::sync::{PushHandle, PushOutcome};
use agenda_core::{Config, Database, Repository};
use serde::Serialize;
use tracing::{info, warn};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the local database with the configured cloud client.
pub fn open_repository() -> Result<Repository, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    Ok(Repository::from_config(db, &config)?)
}

/// Wait for a background push so it is not cut off when the process exits.
pub async fn finish_push(what: &str, push: PushHandle) {
    match push.wait().await {
        PushOutcome::Pushed => info!("{what}: pushed to cloud"),
        PushOutcome::Skipped(reason) => info!("{what}: not pushed ({reason})"),
        PushOutcome::Failed(message) => warn!("{what}: cloud push failed: {message}"),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
