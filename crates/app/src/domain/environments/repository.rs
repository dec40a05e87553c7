//! Environments Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::environments::{
    data::NewEnvironment,
    records::{EnvironmentId, EnvironmentRecord, EnvironmentUuid},
};

const CREATE_ENVIRONMENT_SQL: &str = include_str!("sql/create_environment.sql");
const FIND_ENVIRONMENT_BY_NAME_SQL: &str = include_str!("sql/find_environment_by_name.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgEnvironmentsRepository;

impl PgEnvironmentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_environment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        environment: NewEnvironment,
        now: Timestamp,
    ) -> Result<EnvironmentRecord, sqlx::Error> {
        query_as::<Postgres, EnvironmentRecord>(CREATE_ENVIRONMENT_SQL)
            .bind(environment.uuid.to_string())
            .bind(environment.name)
            .bind(environment.display_name)
            .bind(environment.production)
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_environment_by_name(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Option<EnvironmentRecord>, sqlx::Error> {
        query_as::<Postgres, EnvironmentRecord>(FIND_ENVIRONMENT_BY_NAME_SQL)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for EnvironmentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let uuid: String = row.try_get("uuid")?;

        let uuid = uuid
            .parse::<EnvironmentUuid>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "uuid".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: EnvironmentId::from_i64(row.try_get("id")?),
            uuid,
            name: row.try_get("name")?,
            display_name: row.try_get("display_name")?,
            production: row.try_get("production")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
