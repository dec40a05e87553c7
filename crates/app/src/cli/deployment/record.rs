use broker_app::deployments::{data::NewDeployedVersion, records::DeployedVersionUuid};
use clap::Args;
use uuid::Uuid;

use crate::cli::{
    Services,
    deployment::{find_environment, find_pacticipant, print_deployed_version},
};

#[derive(Debug, Args)]
pub(crate) struct RecordDeploymentArgs {
    /// Pacticipant name
    #[arg(long)]
    pacticipant: String,

    /// Version number of the pacticipant
    #[arg(long)]
    version: String,

    /// Environment name
    #[arg(long)]
    environment: String,

    /// Optional target within the environment
    #[arg(long)]
    target: Option<String>,

    /// Optional deployed version UUID; generated when omitted
    #[arg(long)]
    uuid: Option<Uuid>,
}

pub(crate) async fn run(args: RecordDeploymentArgs, services: &Services) -> Result<(), String> {
    let pacticipant = find_pacticipant(services, &args.pacticipant).await?;
    let environment = find_environment(services, &args.environment).await?;

    let version = services
        .versions
        .find_version(pacticipant.id, args.version.clone())
        .await
        .map_err(|error| format!("failed to find version {}: {error}", args.version))?;

    let deployed_version = services
        .deployments
        .record_deployment(NewDeployedVersion {
            uuid: args
                .uuid
                .map_or_else(DeployedVersionUuid::new, DeployedVersionUuid::from_uuid),
            version_id: version.id,
            pacticipant_id: pacticipant.id,
            environment_id: environment.id,
            target: args.target,
            created_at: None,
        })
        .await
        .map_err(|error| format!("failed to record deployment: {error}"))?;

    print_deployed_version(&deployed_version);

    Ok(())
}
