use broker_app::deployments::DeployedVersionsQuery;
use clap::Args;
use tracing::info;

use crate::cli::{
    Services,
    deployment::{find_environment, find_pacticipant},
};

#[derive(Debug, Args)]
pub(crate) struct UndeployArgs {
    /// Pacticipant name
    #[arg(long)]
    pacticipant: String,

    /// Environment name
    #[arg(long)]
    environment: String,

    /// Only undeploy from this target; all targets when omitted
    #[arg(long)]
    target: Option<String>,
}

pub(crate) async fn run(args: UndeployArgs, services: &Services) -> Result<(), String> {
    let pacticipant = find_pacticipant(services, &args.pacticipant).await?;
    let environment = find_environment(services, &args.environment).await?;

    let mut query = DeployedVersionsQuery::new()
        .for_pacticipant(pacticipant.id)
        .for_environment(environment.id)
        .currently_deployed();

    if let Some(target) = args.target {
        query = query.for_target(Some(target));
    }

    let undeployed = services
        .deployments
        .undeploy_matching(query)
        .await
        .map_err(|error| format!("failed to undeploy: {error}"))?;

    info!(undeployed, "undeployed");

    println!("undeployed: {undeployed}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use broker_app::deployments::DeploymentsServiceError;
    use testresult::TestResult;

    use crate::cli::{deployment::fixtures, tests::MockServices};

    use super::*;

    fn mocks_with_names() -> MockServices {
        let mut mocks = MockServices::new();

        mocks
            .pacticipants
            .expect_find_pacticipant_by_name()
            .returning(|_| Ok(fixtures::pacticipant()));

        mocks
            .environments
            .expect_find_environment_by_name()
            .returning(|_| Ok(fixtures::environment()));

        mocks
    }

    fn args(target: Option<&str>) -> UndeployArgs {
        UndeployArgs {
            pacticipant: "Foo".to_string(),
            environment: "production".to_string(),
            target: target.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn undeploys_current_rows_in_one_call() -> TestResult {
        let mut mocks = mocks_with_names();

        mocks
            .deployments
            .expect_undeploy_matching()
            .withf(|query| {
                *query
                    == DeployedVersionsQuery::new()
                        .for_pacticipant(fixtures::pacticipant().id)
                        .for_environment(fixtures::environment().id)
                        .currently_deployed()
            })
            .times(1)
            .returning(|_| Ok(2));

        mocks.deployments.expect_undeploy().never();

        run(args(None), &mocks.build()).await?;

        Ok(())
    }

    #[tokio::test]
    async fn target_narrows_the_query() -> TestResult {
        let mut mocks = mocks_with_names();

        mocks
            .deployments
            .expect_undeploy_matching()
            .withf(|query| {
                *query
                    == DeployedVersionsQuery::new()
                        .for_pacticipant(fixtures::pacticipant().id)
                        .for_environment(fixtures::environment().id)
                        .currently_deployed()
                        .for_target(Some("blue".to_string()))
            })
            .times(1)
            .returning(|_| Ok(1));

        run(args(Some("blue")), &mocks.build()).await?;

        Ok(())
    }

    #[tokio::test]
    async fn storage_errors_stop_the_command() {
        let mut mocks = mocks_with_names();

        mocks
            .deployments
            .expect_undeploy_matching()
            .returning(|_| Err(DeploymentsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let result = run(args(None), &mocks.build()).await;

        assert!(
            result.is_err_and(|error| error.starts_with("failed to undeploy")),
            "expected an undeploy error"
        );
    }
}
