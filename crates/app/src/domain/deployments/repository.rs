//! Deployments Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    config::resources::NameMatching,
    domain::{
        deployments::{
            data::PreparedDeployedVersion,
            query::DeployedVersionsQuery,
            records::{
                CurrentlyDeployedVersionIdRecord, DeployedVersionId, DeployedVersionRecord,
                DeployedVersionUuid,
            },
        },
        environments::records::EnvironmentId,
        pacticipants::records::PacticipantId,
        versions::records::VersionId,
    },
};

const CREATE_DEPLOYED_VERSION_SQL: &str = include_str!("sql/create_deployed_version.sql");
const INSERT_IGNORE_DEPLOYED_VERSION_SQL: &str =
    include_str!("sql/insert_ignore_deployed_version.sql");
const UPSERT_CURRENTLY_DEPLOYED_VERSION_ID_SQL: &str =
    include_str!("sql/upsert_currently_deployed_version_id.sql");
const DELETE_CURRENTLY_DEPLOYED_VERSION_ID_SQL: &str =
    include_str!("sql/delete_currently_deployed_version_id.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDeploymentsRepository;

impl PgDeploymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_deployed_version(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deployed_version: &PreparedDeployedVersion,
    ) -> Result<DeployedVersionId, sqlx::Error> {
        let id = query_scalar::<Postgres, i64>(CREATE_DEPLOYED_VERSION_SQL)
            .bind(deployed_version.uuid.to_string())
            .bind(deployed_version.version_id.into_i64())
            .bind(deployed_version.pacticipant_id.into_i64())
            .bind(deployed_version.environment_id.into_i64())
            .bind(deployed_version.target.as_deref())
            .bind(&deployed_version.target_for_index)
            .bind(SqlxTimestamp::from(deployed_version.created_at))
            .fetch_one(&mut **tx)
            .await?;

        Ok(DeployedVersionId::from_i64(id))
    }

    /// Insert unless the row conflicts with an existing one; `None` on conflict.
    pub(crate) async fn insert_ignore_deployed_version(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deployed_version: &PreparedDeployedVersion,
    ) -> Result<Option<DeployedVersionId>, sqlx::Error> {
        let id = query_scalar::<Postgres, i64>(INSERT_IGNORE_DEPLOYED_VERSION_SQL)
            .bind(deployed_version.uuid.to_string())
            .bind(deployed_version.version_id.into_i64())
            .bind(deployed_version.pacticipant_id.into_i64())
            .bind(deployed_version.environment_id.into_i64())
            .bind(deployed_version.target.as_deref())
            .bind(&deployed_version.target_for_index)
            .bind(SqlxTimestamp::from(deployed_version.created_at))
            .fetch_optional(&mut **tx)
            .await?;

        Ok(id.map(DeployedVersionId::from_i64))
    }

    /// Point the deployed version's key at `deployed_version_id`, replacing any
    /// existing pointer for that key.
    pub(crate) async fn upsert_currently_deployed_version_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deployed_version: &PreparedDeployedVersion,
        deployed_version_id: DeployedVersionId,
        now: Timestamp,
    ) -> Result<CurrentlyDeployedVersionIdRecord, sqlx::Error> {
        query_as::<Postgres, CurrentlyDeployedVersionIdRecord>(
            UPSERT_CURRENTLY_DEPLOYED_VERSION_ID_SQL,
        )
        .bind(deployed_version.pacticipant_id.into_i64())
        .bind(deployed_version.environment_id.into_i64())
        .bind(deployed_version.version_id.into_i64())
        .bind(&deployed_version.target_for_index)
        .bind(deployed_version_id.into_i64())
        .bind(SqlxTimestamp::from(now))
        .fetch_one(&mut **tx)
        .await
    }

    pub(crate) async fn delete_currently_deployed_version_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deployed_version_id: DeployedVersionId,
    ) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_CURRENTLY_DEPLOYED_VERSION_ID_SQL)
            .bind(deployed_version_id.into_i64())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    /// Delete the pointers referencing any row matched by `query`.
    pub(crate) async fn remove_currently_deployed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        query: &DeployedVersionsQuery,
        matching: NameMatching,
    ) -> Result<u64, sqlx::Error> {
        let mut builder = query.remove_currently_deployed(matching);
        let result = builder.build().execute(&mut **tx).await?;

        Ok(result.rows_affected())
    }

    pub(crate) async fn find_deployed_versions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        query: &DeployedVersionsQuery,
        matching: NameMatching,
    ) -> Result<Vec<DeployedVersionRecord>, sqlx::Error> {
        let mut builder = query.select(matching);

        builder
            .build_query_as::<DeployedVersionRecord>()
            .fetch_all(&mut **tx)
            .await
    }

    /// First row matched by `query`, in the query's order.
    pub(crate) async fn find_deployed_version(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        query: &DeployedVersionsQuery,
        matching: NameMatching,
    ) -> Result<Option<DeployedVersionRecord>, sqlx::Error> {
        let mut builder = query.select(matching);

        builder
            .build_query_as::<DeployedVersionRecord>()
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_deployed_version(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: DeployedVersionId,
    ) -> Result<DeployedVersionRecord, sqlx::Error> {
        let mut builder = DeployedVersionsQuery::new()
            .for_id(id)
            .select(NameMatching::default());

        builder
            .build_query_as::<DeployedVersionRecord>()
            .fetch_one(&mut **tx)
            .await
    }

    /// Stamp `undeployed_at` on matched rows that do not have one yet.
    pub(crate) async fn record_undeployed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        query: &DeployedVersionsQuery,
        matching: NameMatching,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let mut builder = query.record_undeployed(matching, now);
        let result = builder.build().execute(&mut **tx).await?;

        Ok(result.rows_affected())
    }
}

fn parse_uuid(row: &PgRow) -> sqlx::Result<DeployedVersionUuid> {
    let uuid: String = row.try_get("uuid")?;

    uuid.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "uuid".to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for DeployedVersionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: DeployedVersionId::from_i64(row.try_get("id")?),
            uuid: parse_uuid(row)?,
            version_id: VersionId::from_i64(row.try_get("version_id")?),
            pacticipant_id: PacticipantId::from_i64(row.try_get("pacticipant_id")?),
            environment_id: EnvironmentId::from_i64(row.try_get("environment_id")?),
            target: row.try_get("target")?,
            target_for_index: row.try_get("target_for_index")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            undeployed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("undeployed_at")?
                .map(SqlxTimestamp::to_jiff),
            version_number: row.try_get("version_number")?,
            currently_deployed: row.try_get("currently_deployed")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CurrentlyDeployedVersionIdRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            pacticipant_id: PacticipantId::from_i64(row.try_get("pacticipant_id")?),
            environment_id: EnvironmentId::from_i64(row.try_get("environment_id")?),
            version_id: VersionId::from_i64(row.try_get("version_id")?),
            target_for_index: row.try_get("target_for_index")?,
            deployed_version_id: DeployedVersionId::from_i64(row.try_get("deployed_version_id")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
