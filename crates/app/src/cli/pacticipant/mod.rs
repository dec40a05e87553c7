use clap::{Args, Subcommand};

use crate::cli::Services;

mod create;

#[derive(Debug, Args)]
pub(crate) struct PacticipantCommand {
    #[command(subcommand)]
    command: PacticipantSubcommand,
}

#[derive(Debug, Subcommand)]
enum PacticipantSubcommand {
    Create(create::CreatePacticipantArgs),
}

pub(crate) async fn run(command: PacticipantCommand, services: &Services) -> Result<(), String> {
    match command.command {
        PacticipantSubcommand::Create(args) => create::run(args, services).await,
    }
}
