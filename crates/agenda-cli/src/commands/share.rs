//! Event sharing between two devices.
//!
//! The sender publishes the event and hands its code to a listening peer;
//! the receiver waits for exactly one code and looks the event up.

use agenda_core::share::{self, ShareStatus, TcpAcceptor};
use agenda_core::{Config, ValidationError};
use clap::Subcommand;

use super::{finish_push, open_repository, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ShareAction {
    /// Publish a local event and optionally hand its code to a peer
    Send {
        /// Event ID
        id: String,
        /// Peer address (host:port) running `agenda share receive`
        #[arg(long)]
        to: Option<String>,
    },
    /// Wait for one peer to send a share code, then fetch the event
    Receive {
        /// Listen address (default: share.listen_addr)
        #[arg(long)]
        listen: Option<String>,
        /// Store the received event locally
        #[arg(long)]
        save: bool,
    },
    /// Fetch a shared event by code
    Fetch {
        /// Share code
        code: String,
        /// Store the event locally
        #[arg(long)]
        save: bool,
    },
}

pub async fn run(action: ShareAction) -> CmdResult {
    match action {
        ShareAction::Send { id, to } => {
            let repo = open_repository()?;
            let event = repo.event(&id)?.ok_or_else(|| ValidationError::NotFound {
                kind: "event",
                id: id.clone(),
            })?;
            let code = repo.share_event(&event).await?;
            println!("Share code: {code}");
            if let Some(peer) = to {
                share::connect_and_send(&peer, &code).await?;
                println!("Sent to {peer}");
            }
        }
        ShareAction::Receive { listen, save } => {
            let config = Config::load()?;
            let addr = listen.unwrap_or(config.share.listen_addr);
            let acceptor = TcpAcceptor::bind(&addr, &config.share.service_name).await?;
            eprintln!(
                "Waiting for a peer on {} ({})",
                acceptor.local_addr()?,
                acceptor.service_name()
            );

            let mut listener = share::spawn_listener(acceptor, config.share.read_buffer);
            while let Some(status) = listener.status.recv().await {
                match status {
                    ShareStatus::Listening => {}
                    ShareStatus::Connected => eprintln!("Peer connected"),
                    ShareStatus::Received(ref code) => eprintln!("Received code {code}"),
                    ShareStatus::ConnectionLost => eprintln!("Connection lost"),
                }
            }
            match listener.join().await? {
                Some(code) => fetch(&code, save).await?,
                None => return Err("peer closed the connection without sending a code".into()),
            }
        }
        ShareAction::Fetch { code, save } => fetch(&code, save).await?,
    }
    Ok(())
}

async fn fetch(code: &str, save: bool) -> CmdResult {
    let repo = open_repository()?;
    if save {
        let (event, write) = repo.import_shared_event(code).await?;
        println!("Event saved: {}", event.id);
        print_json(&event)?;
        finish_push("share import", write.push).await;
    } else {
        let event = repo.fetch_shared_event(code).await?;
        print_json(&event)?;
    }
    Ok(())
}
