//! Broker Application CLI

use std::process;

use broker_app::{config, logging};
use clap::Parser;
use tracing::error;

mod cli;

#[tokio::main]
pub async fn main() {
    config::load_dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = logging::init_subscriber(&cli.config.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = cli.run().await {
        error!(%error, "command failed");
        eprintln!("{error}");
        process::exit(1);
    }
}
