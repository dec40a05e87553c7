use clap::{Args, Subcommand};

use crate::cli::Services;

mod create;

#[derive(Debug, Args)]
pub(crate) struct EnvironmentCommand {
    #[command(subcommand)]
    command: EnvironmentSubcommand,
}

#[derive(Debug, Subcommand)]
enum EnvironmentSubcommand {
    Create(create::CreateEnvironmentArgs),
}

pub(crate) async fn run(command: EnvironmentCommand, services: &Services) -> Result<(), String> {
    match command.command {
        EnvironmentSubcommand::Create(args) => create::run(args, services).await,
    }
}
