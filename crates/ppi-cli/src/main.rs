//! Binary entrypoint for the profanity-power-index command.
use clap::Parser;
use ppi_cli::{commands, logging, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Flags fall back to the environment, so `.env` must be loaded first.
    ppi_core::config::load_dotenv();
    let cli = Cli::parse();
    logging::init(cli.log_json)?;
    commands::run(cli).await
}
