use broker_app::{
    pacticipants::{PacticipantsServiceError, data::NewPacticipant},
    versions::data::NewVersion,
};
use clap::Args;

use crate::cli::Services;

#[derive(Debug, Args)]
pub(crate) struct CreateVersionArgs {
    /// Pacticipant name; created when it does not exist yet
    #[arg(long)]
    pacticipant: String,

    /// Version number
    #[arg(long)]
    number: String,
}

pub(crate) async fn run(args: CreateVersionArgs, services: &Services) -> Result<(), String> {
    if args.number.trim().is_empty() {
        return Err("number cannot be empty".to_string());
    }

    let pacticipant = match services
        .pacticipants
        .find_pacticipant_by_name(args.pacticipant.clone())
        .await
    {
        Ok(pacticipant) => pacticipant,
        Err(PacticipantsServiceError::NotFound) => services
            .pacticipants
            .create_pacticipant(NewPacticipant {
                name: args.pacticipant,
                display_name: None,
            })
            .await
            .map_err(|error| format!("failed to create pacticipant: {error}"))?,
        Err(error) => return Err(format!("failed to find pacticipant: {error}")),
    };

    let version = services
        .versions
        .create_version(NewVersion {
            pacticipant_id: pacticipant.id,
            number: args.number,
        })
        .await
        .map_err(|error| format!("failed to create version: {error}"))?;

    println!("pacticipant_name: {}", pacticipant.name);
    println!("version_id: {}", version.id);
    println!("version_number: {}", version.number);

    Ok(())
}
