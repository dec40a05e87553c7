use broker_app::environments::{data::NewEnvironment, records::EnvironmentUuid};
use clap::Args;
use uuid::Uuid;

use crate::cli::Services;

#[derive(Debug, Args)]
pub(crate) struct CreateEnvironmentArgs {
    /// Environment name, e.g. `production`
    #[arg(long)]
    name: String,

    /// Optional display name
    #[arg(long)]
    display_name: Option<String>,

    /// Mark the environment as serving real users
    #[arg(long)]
    production: bool,

    /// Optional environment UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateEnvironmentArgs, services: &Services) -> Result<(), String> {
    if args.name.trim().is_empty() {
        return Err("name cannot be empty".to_string());
    }

    let environment = services
        .environments
        .create_environment(NewEnvironment {
            uuid: args
                .uuid
                .map_or_else(EnvironmentUuid::new, EnvironmentUuid::from_uuid),
            name: args.name,
            display_name: args.display_name,
            production: args.production,
        })
        .await
        .map_err(|error| format!("failed to create environment: {error}"))?;

    println!("environment_uuid: {}", environment.uuid);
    println!("environment_name: {}", environment.name);
    println!("production: {}", environment.production);

    Ok(())
}
