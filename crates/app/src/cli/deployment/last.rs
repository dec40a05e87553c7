use clap::Args;

use crate::cli::{
    Services,
    deployment::{find_environment, find_pacticipant, print_deployed_version},
};

#[derive(Debug, Args)]
pub(crate) struct LastDeploymentArgs {
    /// Pacticipant name
    #[arg(long)]
    pacticipant: String,

    /// Environment name
    #[arg(long)]
    environment: String,
}

pub(crate) async fn run(args: LastDeploymentArgs, services: &Services) -> Result<(), String> {
    let pacticipant = find_pacticipant(services, &args.pacticipant).await?;
    let environment = find_environment(services, &args.environment).await?;

    let deployed_version = services
        .deployments
        .last_deployed_version(pacticipant.id, environment.id)
        .await
        .map_err(|error| format!("failed to find last deployed version: {error}"))?;

    match deployed_version {
        Some(deployed_version) => print_deployed_version(&deployed_version),
        None => println!(
            "{} is not currently deployed to {}",
            pacticipant.name, environment.name
        ),
    }

    Ok(())
}
