//! Environments service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::environments::{
        data::NewEnvironment, errors::EnvironmentsServiceError, records::EnvironmentRecord,
        repository::PgEnvironmentsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgEnvironmentsService {
    db: Db,
    repository: PgEnvironmentsRepository,
}

impl PgEnvironmentsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgEnvironmentsRepository::new(),
        }
    }
}

#[async_trait]
impl EnvironmentsService for PgEnvironmentsService {
    #[tracing::instrument(
        name = "environments.service.create_environment",
        skip(self, environment),
        fields(environment_uuid = %environment.uuid, environment_name = %environment.name),
        err
    )]
    async fn create_environment(
        &self,
        environment: NewEnvironment,
    ) -> Result<EnvironmentRecord, EnvironmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_environment(&mut tx, environment, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(environment_id = %created.id, "created environment");

        Ok(created)
    }

    async fn find_environment_by_name(
        &self,
        name: String,
    ) -> Result<EnvironmentRecord, EnvironmentsServiceError> {
        let mut tx = self.db.begin().await?;

        let environment = self
            .repository
            .find_environment_by_name(&mut tx, &name)
            .await?;

        tx.commit().await?;

        environment.ok_or(EnvironmentsServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
/// Environment persistence operations.
pub trait EnvironmentsService: Send + Sync {
    /// Creates a new environment.
    async fn create_environment(
        &self,
        environment: NewEnvironment,
    ) -> Result<EnvironmentRecord, EnvironmentsServiceError>;

    /// Finds an environment by its exact name.
    async fn find_environment_by_name(
        &self,
        name: String,
    ) -> Result<EnvironmentRecord, EnvironmentsServiceError>;
}
