use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "agenda", version, about = "Agenda CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Calendar event management
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Share events with a nearby device
    Share {
        #[command(subcommand)]
        action: commands::share::ShareAction,
    },
    /// Cloud identity and remote reads
    Cloud {
        #[command(subcommand)]
        action: commands::cloud::CloudAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

async fn dispatch(command: Commands) -> commands::CmdResult {
    match command {
        Commands::Task { action } => commands::task::run(action).await,
        Commands::Event { action } => commands::event::run(action).await,
        Commands::Share { action } => commands::share::run(action).await,
        Commands::Cloud { action } => commands::cloud::run(action).await,
        Commands::Config { action } => commands::config::run(action),
    }
}

fn main() {
    let cli = Cli::parse();
    commands::logging::init();

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(Into::into)
        .and_then(|runtime| runtime.block_on(dispatch(cli.command)));

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
