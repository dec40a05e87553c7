use clap::{Args, Subcommand};

use crate::cli::Services;

mod create;

#[derive(Debug, Args)]
pub(crate) struct VersionCommand {
    #[command(subcommand)]
    command: VersionSubcommand,
}

#[derive(Debug, Subcommand)]
enum VersionSubcommand {
    Create(create::CreateVersionArgs),
}

pub(crate) async fn run(command: VersionCommand, services: &Services) -> Result<(), String> {
    match command.command {
        VersionSubcommand::Create(args) => create::run(args, services).await,
    }
}
