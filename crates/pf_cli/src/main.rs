use anyhow::Result;
use clap::Parser;
use pf_sync::{handle_command, init_logging, SyncArgs, SyncCommands};
use tracing::{error, warn};

#[derive(Parser, Debug)]
#[command(name = "pf", author, version, about = "Upload locally generated articles to MongoDB", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    sync: SyncArgs,
    #[command(subcommand)]
    command: Option<SyncCommands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!("Failed to load .env: {}", e);
        }
    }

    let config = cli.sync.to_config();
    if let Err(e) = handle_command(cli.command.unwrap_or_default(), config).await {
        error!("Upload failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
