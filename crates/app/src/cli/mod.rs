use broker_app::{
    config::{AppConfig, resources::NameMatching},
    database::{self, Db},
    deployments::{DeploymentsService, PgDeploymentsService},
    environments::{EnvironmentsService, PgEnvironmentsService},
    pacticipants::{PacticipantsService, PgPacticipantsService},
    versions::{PgVersionsService, VersionsService},
};
use clap::{Parser, Subcommand};

mod db;
mod deployment;
mod environment;
mod pacticipant;
mod version;

#[derive(Debug, Parser)]
#[command(name = "broker-app", about = "Deployed version broker CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Pacticipant(pacticipant::PacticipantCommand),
    Environment(environment::EnvironmentCommand),
    Version(version::VersionCommand),
    Deployment(deployment::DeploymentCommand),
}

/// Services the data commands run against.
pub(crate) struct Services {
    pub(crate) pacticipants: Box<dyn PacticipantsService>,
    pub(crate) versions: Box<dyn VersionsService>,
    pub(crate) environments: Box<dyn EnvironmentsService>,
    pub(crate) deployments: Box<dyn DeploymentsService>,
}

impl Services {
    fn postgres(db: &Db, name_matching: NameMatching) -> Self {
        Self {
            pacticipants: Box::new(PgPacticipantsService::new(db.clone(), name_matching)),
            versions: Box::new(PgVersionsService::new(db.clone())),
            environments: Box::new(PgEnvironmentsService::new(db.clone())),
            deployments: Box::new(PgDeploymentsService::new(db.clone(), name_matching)),
        }
    }
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let pool = database::connect(&self.config.database.database_url)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))?;

        let name_matching = self.config.resources.name_matching();
        let services = || Services::postgres(&Db::new(pool.clone()), name_matching);

        match self.command {
            Commands::Db(command) => db::run(command, &pool).await,
            Commands::Pacticipant(command) => pacticipant::run(command, &services()).await,
            Commands::Environment(command) => environment::run(command, &services()).await,
            Commands::Version(command) => version::run(command, &services()).await,
            Commands::Deployment(command) => deployment::run(command, &services()).await,
        }
    }
}
