//! Deployments service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    config::resources::NameMatching,
    database::Db,
    domain::{
        deployments::{
            data::{NewDeployedVersion, PreparedDeployedVersion},
            errors::DeploymentsServiceError,
            query::DeployedVersionsQuery,
            records::{DeployedVersionId, DeployedVersionRecord, DeployedVersionUuid},
            repository::PgDeploymentsRepository,
        },
        environments::records::EnvironmentId,
        pacticipants::records::PacticipantId,
    },
};

#[derive(Debug, Clone)]
pub struct PgDeploymentsService {
    db: Db,
    repository: PgDeploymentsRepository,
    name_matching: NameMatching,
}

impl PgDeploymentsService {
    #[must_use]
    pub fn new(db: Db, name_matching: NameMatching) -> Self {
        Self {
            db,
            repository: PgDeploymentsRepository::new(),
            name_matching,
        }
    }

    /// Insert the row and point its key at it, on the caller's transaction.
    async fn insert_deployed_version(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deployed_version: NewDeployedVersion,
        now: Timestamp,
    ) -> Result<DeployedVersionRecord, sqlx::Error> {
        let prepared = deployed_version.prepare(now);

        let id = self
            .repository
            .create_deployed_version(tx, &prepared)
            .await?;

        self.point_key_at(tx, &prepared, id, now).await
    }

    /// Make `id` the current deployment for the prepared row's key and reload it.
    async fn point_key_at(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        prepared: &PreparedDeployedVersion,
        id: DeployedVersionId,
        now: Timestamp,
    ) -> Result<DeployedVersionRecord, sqlx::Error> {
        let pointer = self
            .repository
            .upsert_currently_deployed_version_id(tx, prepared, id, now)
            .await?;

        debug!(
            deployed_version_id = %pointer.deployed_version_id,
            target_for_index = %pointer.target_for_index,
            "updated currently deployed version id"
        );

        self.repository.get_deployed_version(tx, id).await
    }
}

#[async_trait]
impl DeploymentsService for PgDeploymentsService {
    #[tracing::instrument(
        name = "deployments.service.create_deployed_version",
        skip(self, deployed_version),
        fields(
            deployed_version_uuid = %deployed_version.uuid,
            version_id = %deployed_version.version_id,
            environment_id = %deployed_version.environment_id
        ),
        err
    )]
    async fn create_deployed_version(
        &self,
        deployed_version: NewDeployedVersion,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .insert_deployed_version(&mut tx, deployed_version, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(deployed_version_id = %created.id, "created deployed version");

        Ok(created)
    }

    #[tracing::instrument(
        name = "deployments.service.find_or_create_deployed_version",
        skip(self, deployed_version),
        fields(
            version_id = %deployed_version.version_id,
            environment_id = %deployed_version.environment_id
        ),
        err
    )]
    async fn find_or_create_deployed_version(
        &self,
        deployed_version: NewDeployedVersion,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let query = DeployedVersionsQuery::new()
            .for_version_and_environment_and_target(
                deployed_version.version_id,
                deployed_version.environment_id,
                deployed_version.target.clone(),
            )
            .currently_deployed()
            .order_by_date_desc();

        let existing = self
            .repository
            .find_deployed_version(&mut tx, &query, self.name_matching)
            .await?;

        let record = match existing {
            Some(record) => record,
            None => {
                let created = self
                    .insert_deployed_version(&mut tx, deployed_version, Timestamp::now())
                    .await?;

                info!(deployed_version_id = %created.id, "created deployed version");

                created
            }
        };

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "deployments.service.insert_ignore_deployed_version",
        skip(self, deployed_version),
        fields(
            deployed_version_uuid = %deployed_version.uuid,
            version_id = %deployed_version.version_id,
            environment_id = %deployed_version.environment_id
        ),
        err
    )]
    async fn insert_ignore_deployed_version(
        &self,
        deployed_version: NewDeployedVersion,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError> {
        let now = Timestamp::now();
        let prepared = deployed_version.prepare(now);
        let mut tx = self.db.begin().await?;

        let id = match self
            .repository
            .insert_ignore_deployed_version(&mut tx, &prepared)
            .await?
        {
            Some(id) => {
                info!(deployed_version_id = %id, "created deployed version");

                id
            }
            None => {
                let identifying = DeployedVersionsQuery::new()
                    .for_pacticipant(prepared.pacticipant_id)
                    .for_version_and_environment(prepared.version_id, prepared.environment_id)
                    .for_target_key(Some(prepared.target_for_index.as_str()))
                    .order_by_date_desc();

                let existing = self
                    .repository
                    .find_deployed_version(&mut tx, &identifying, self.name_matching)
                    .await?
                    .ok_or(DeploymentsServiceError::AlreadyExists)?;

                debug!(deployed_version_id = %existing.id, "insert ignored, using existing row");

                existing.id
            }
        };

        let record = self.point_key_at(&mut tx, &prepared, id, now).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "deployments.service.record_deployment",
        skip(self, deployed_version),
        fields(
            deployed_version_uuid = %deployed_version.uuid,
            pacticipant_id = %deployed_version.pacticipant_id,
            environment_id = %deployed_version.environment_id
        ),
        err
    )]
    async fn record_deployment(
        &self,
        deployed_version: NewDeployedVersion,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError> {
        let now = Timestamp::now();
        let mut tx = self.db.begin().await?;

        let previous = DeployedVersionsQuery::new()
            .for_pacticipant(deployed_version.pacticipant_id)
            .for_environment(deployed_version.environment_id)
            .for_target_key(deployed_version.target.as_deref())
            .currently_deployed();

        let undeployed = self
            .repository
            .record_undeployed(&mut tx, &previous, self.name_matching, now)
            .await?;

        self.repository
            .remove_currently_deployed(&mut tx, &previous, self.name_matching)
            .await?;

        let created = self
            .insert_deployed_version(&mut tx, deployed_version, now)
            .await?;

        tx.commit().await?;

        info!(
            deployed_version_id = %created.id,
            undeployed,
            "recorded deployment"
        );

        Ok(created)
    }

    #[tracing::instrument(
        name = "deployments.service.find_deployed_version",
        skip(self),
        fields(deployed_version_uuid = %uuid),
        err
    )]
    async fn find_deployed_version(
        &self,
        uuid: DeployedVersionUuid,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let deployed_version = self
            .repository
            .find_deployed_version(
                &mut tx,
                &DeployedVersionsQuery::new().for_uuid(uuid),
                self.name_matching,
            )
            .await?;

        tx.commit().await?;

        deployed_version.ok_or(DeploymentsServiceError::NotFound)
    }

    #[tracing::instrument(
        name = "deployments.service.find_deployed_versions",
        skip(self, query),
        err
    )]
    async fn find_deployed_versions(
        &self,
        query: DeployedVersionsQuery,
    ) -> Result<Vec<DeployedVersionRecord>, DeploymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let deployed_versions = self
            .repository
            .find_deployed_versions(&mut tx, &query, self.name_matching)
            .await?;

        tx.commit().await?;

        Ok(deployed_versions)
    }

    #[tracing::instrument(
        name = "deployments.service.last_deployed_version",
        skip(self),
        fields(pacticipant_id = %pacticipant_id, environment_id = %environment_id),
        err
    )]
    async fn last_deployed_version(
        &self,
        pacticipant_id: PacticipantId,
        environment_id: EnvironmentId,
    ) -> Result<Option<DeployedVersionRecord>, DeploymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let query = DeployedVersionsQuery::new()
            .currently_deployed()
            .for_pacticipant(pacticipant_id)
            .for_environment(environment_id)
            .order_by_date_desc()
            .limit(1);

        let deployed_version = self
            .repository
            .find_deployed_version(&mut tx, &query, self.name_matching)
            .await?;

        tx.commit().await?;

        Ok(deployed_version)
    }

    #[tracing::instrument(
        name = "deployments.service.record_undeployed",
        skip(self, query),
        err
    )]
    async fn record_undeployed(
        &self,
        query: DeployedVersionsQuery,
    ) -> Result<u64, DeploymentsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .record_undeployed(&mut tx, &query, self.name_matching, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(updated, "recorded deployed versions undeployed");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "deployments.service.record_deployed_version_undeployed",
        skip(self),
        fields(deployed_version_id = %id),
        err
    )]
    async fn record_deployed_version_undeployed(
        &self,
        id: DeployedVersionId,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository
            .record_undeployed(
                &mut tx,
                &DeployedVersionsQuery::new().for_id(id),
                self.name_matching,
                Timestamp::now(),
            )
            .await?;

        let reloaded = self.repository.get_deployed_version(&mut tx, id).await?;

        tx.commit().await?;

        Ok(reloaded)
    }

    #[tracing::instrument(
        name = "deployments.service.undeploy",
        skip(self),
        fields(deployed_version_id = %id),
        err
    )]
    async fn undeploy(
        &self,
        id: DeployedVersionId,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository
            .delete_currently_deployed_version_id(&mut tx, id)
            .await?;

        self.repository
            .record_undeployed(
                &mut tx,
                &DeployedVersionsQuery::new().for_id(id),
                self.name_matching,
                Timestamp::now(),
            )
            .await?;

        let reloaded = self.repository.get_deployed_version(&mut tx, id).await?;

        tx.commit().await?;

        info!("undeployed deployed version");

        Ok(reloaded)
    }

    #[tracing::instrument(
        name = "deployments.service.undeploy_matching",
        skip(self, query),
        err
    )]
    async fn undeploy_matching(
        &self,
        query: DeployedVersionsQuery,
    ) -> Result<u64, DeploymentsServiceError> {
        let now = Timestamp::now();
        let current = query.currently_deployed();
        let mut tx = self.db.begin().await?;

        let stamped = self
            .repository
            .record_undeployed(&mut tx, &current, self.name_matching, now)
            .await?;

        let removed = self
            .repository
            .remove_currently_deployed(&mut tx, &current, self.name_matching)
            .await?;

        tx.commit().await?;

        info!(removed, stamped, "undeployed deployed versions");

        Ok(removed)
    }
}

#[automock]
#[async_trait]
/// Deployed version persistence operations.
pub trait DeploymentsService: Send + Sync {
    /// Inserts a deployed version and makes it the current deployment for its
    /// `(pacticipant, environment, version, target)` key, in one transaction.
    async fn create_deployed_version(
        &self,
        deployed_version: NewDeployedVersion,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError>;

    /// Returns the currently deployed row for the same version, environment and
    /// target, creating one when none exists.
    async fn find_or_create_deployed_version(
        &self,
        deployed_version: NewDeployedVersion,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError>;

    /// Inserts a deployed version unless it conflicts with an existing row, in
    /// which case the newest row with the same pacticipant, version,
    /// environment and target key is used. Either way the key points at the
    /// returned row.
    async fn insert_ignore_deployed_version(
        &self,
        deployed_version: NewDeployedVersion,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError>;

    /// Marks every currently deployed version of the pacticipant on the same
    /// environment and target as undeployed, then creates the new deployment.
    async fn record_deployment(
        &self,
        deployed_version: NewDeployedVersion,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError>;

    async fn find_deployed_version(
        &self,
        uuid: DeployedVersionUuid,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError>;

    async fn find_deployed_versions(
        &self,
        query: DeployedVersionsQuery,
    ) -> Result<Vec<DeployedVersionRecord>, DeploymentsServiceError>;

    /// The newest currently deployed version of a pacticipant in an environment,
    /// ordered by `created_at` then `id`.
    async fn last_deployed_version(
        &self,
        pacticipant_id: PacticipantId,
        environment_id: EnvironmentId,
    ) -> Result<Option<DeployedVersionRecord>, DeploymentsServiceError>;

    /// Stamps `undeployed_at` on rows matched by `query` that have none yet and
    /// returns how many rows changed.
    async fn record_undeployed(
        &self,
        query: DeployedVersionsQuery,
    ) -> Result<u64, DeploymentsServiceError>;

    /// Stamps `undeployed_at` on one row and returns it reloaded.
    async fn record_deployed_version_undeployed(
        &self,
        id: DeployedVersionId,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError>;

    /// Removes the row's currently deployed pointer and stamps `undeployed_at`.
    async fn undeploy(
        &self,
        id: DeployedVersionId,
    ) -> Result<DeployedVersionRecord, DeploymentsServiceError>;

    /// Undeploys every currently deployed row matched by `query` in one
    /// transaction and returns how many rows stopped being current.
    async fn undeploy_matching(
        &self,
        query: DeployedVersionsQuery,
    ) -> Result<u64, DeploymentsServiceError>;
}
