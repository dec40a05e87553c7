use broker_app::pacticipants::data::NewPacticipant;
use clap::Args;

use crate::cli::Services;

#[derive(Debug, Args)]
pub(crate) struct CreatePacticipantArgs {
    /// Pacticipant name
    #[arg(long)]
    name: String,

    /// Optional display name
    #[arg(long)]
    display_name: Option<String>,
}

pub(crate) async fn run(args: CreatePacticipantArgs, services: &Services) -> Result<(), String> {
    if args.name.trim().is_empty() {
        return Err("name cannot be empty".to_string());
    }

    let pacticipant = services
        .pacticipants
        .create_pacticipant(NewPacticipant {
            name: args.name,
            display_name: args.display_name,
        })
        .await
        .map_err(|error| format!("failed to create pacticipant: {error}"))?;

    println!("pacticipant_id: {}", pacticipant.id);
    println!("pacticipant_name: {}", pacticipant.name);

    Ok(())
}
