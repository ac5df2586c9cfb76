//! Device identity and read-only views of the remote store.

use agenda_core::cloud::identity;
use agenda_core::CloudError;
use clap::Subcommand;

use super::{open_repository, print_json, CmdResult};

#[derive(Subcommand)]
pub enum CloudAction {
    /// Obtain a device UUID from the server
    Register {
        /// Replace an existing UUID
        #[arg(long)]
        force: bool,
    },
    /// Print the stored device UUID
    Id,
    /// Store a device UUID obtained elsewhere
    SetId {
        /// Device UUID
        uuid: String,
    },
    /// Forget the stored device UUID
    ClearId,
    /// List tasks stored remotely for this device
    Tasks,
    /// List events stored remotely for this device
    Events,
}

pub async fn run(action: CloudAction) -> CmdResult {
    let repo = open_repository()?;

    match action {
        CloudAction::Register { force } => {
            let client = repo.client().ok_or(CloudError::Disabled)?;
            let id = identity::register(repo.db(), client, force).await?;
            println!("{id}");
        }
        CloudAction::Id => println!("{}", identity::device_id(repo.db())?),
        CloudAction::SetId { uuid } => {
            let id = identity::set_device_id(repo.db(), &uuid)?;
            println!("{id}");
        }
        CloudAction::ClearId => {
            if identity::clear_device_id(repo.db())? {
                println!("device UUID cleared");
            } else {
                println!("no device UUID stored");
            }
        }
        CloudAction::Tasks => print_json(&repo.remote_tasks().await?)?,
        CloudAction::Events => print_json(&repo.remote_events().await?)?,
    }
    Ok(())
}
