use broker_app::{
    deployments::records::DeployedVersionRecord,
    environments::records::EnvironmentRecord,
    pacticipants::records::PacticipantRecord,
};
use clap::{Args, Subcommand};

use crate::cli::Services;

mod last;
mod list;
mod record;
mod undeploy;

#[derive(Debug, Args)]
pub(crate) struct DeploymentCommand {
    #[command(subcommand)]
    command: DeploymentSubcommand,
}

#[derive(Debug, Subcommand)]
enum DeploymentSubcommand {
    /// Record a version as deployed, undeploying whatever it replaces
    Record(record::RecordDeploymentArgs),

    /// Mark currently deployed versions as undeployed
    Undeploy(undeploy::UndeployArgs),

    List(list::ListDeploymentsArgs),

    /// Show the newest currently deployed version
    Last(last::LastDeploymentArgs),
}

pub(crate) async fn run(command: DeploymentCommand, services: &Services) -> Result<(), String> {
    match command.command {
        DeploymentSubcommand::Record(args) => record::run(args, services).await,
        DeploymentSubcommand::Undeploy(args) => undeploy::run(args, services).await,
        DeploymentSubcommand::List(args) => list::run(args, services).await,
        DeploymentSubcommand::Last(args) => last::run(args, services).await,
    }
}

async fn find_pacticipant(services: &Services, name: &str) -> Result<PacticipantRecord, String> {
    services
        .pacticipants
        .find_pacticipant_by_name(name.to_string())
        .await
        .map_err(|error| format!("failed to find pacticipant {name}: {error}"))
}

async fn find_environment(services: &Services, name: &str) -> Result<EnvironmentRecord, String> {
    services
        .environments
        .find_environment_by_name(name.to_string())
        .await
        .map_err(|error| format!("failed to find environment {name}: {error}"))
}

fn print_deployed_version(deployed_version: &DeployedVersionRecord) {
    println!("deployed_version_uuid: {}", deployed_version.uuid);
    println!("version_number: {}", deployed_version.version_number());
    println!(
        "target: {}",
        deployed_version.target.as_deref().unwrap_or("none")
    );
    println!("created_at: {}", deployed_version.created_at);
    println!("currently_deployed: {}", deployed_version.currently_deployed());
    println!(
        "undeployed_at: {}",
        deployed_version
            .undeployed_at
            .map_or_else(|| "never".to_string(), |value| value.to_string())
    );
}
