use broker_app::deployments::DeployedVersionsQuery;
use clap::Args;

use crate::cli::{Services, deployment::print_deployed_version};

#[derive(Debug, Args)]
pub(crate) struct ListDeploymentsArgs {
    /// Environment name
    #[arg(long)]
    environment: String,

    /// Pacticipant name; `%` and `_` act as `LIKE` wildcards
    #[arg(long)]
    pacticipant: Option<String>,

    /// Only rows deployed to this target
    #[arg(long)]
    target: Option<String>,

    /// Only rows that are still currently deployed
    #[arg(long)]
    currently_deployed: bool,
}

impl ListDeploymentsArgs {
    fn query(&self) -> DeployedVersionsQuery {
        let mut query = DeployedVersionsQuery::new().for_environment_name(&self.environment);

        if let Some(pacticipant) = &self.pacticipant {
            query = query.for_pacticipant_name(pacticipant);
        }

        if let Some(target) = &self.target {
            query = query.for_target(Some(target.clone()));
        }

        if self.currently_deployed {
            query = query.currently_deployed();
        }

        query.order_by_date_desc()
    }
}

pub(crate) async fn run(args: ListDeploymentsArgs, services: &Services) -> Result<(), String> {
    let deployed_versions = services
        .deployments
        .find_deployed_versions(args.query())
        .await
        .map_err(|error| format!("failed to list deployed versions: {error}"))?;

    if deployed_versions.is_empty() {
        println!("no deployed versions found in {}", args.environment);
        return Ok(());
    }

    for deployed_version in &deployed_versions {
        print_deployed_version(deployed_version);
        println!();
    }

    Ok(())
}
