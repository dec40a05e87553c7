//! Versions Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    pacticipants::records::PacticipantId,
    versions::{
        data::NewVersion,
        records::{VersionId, VersionRecord},
    },
};

const CREATE_VERSION_SQL: &str = include_str!("sql/create_version.sql");
const FIND_VERSION_SQL: &str = include_str!("sql/find_version.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgVersionsRepository;

impl PgVersionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_version(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        version: NewVersion,
        now: Timestamp,
    ) -> Result<VersionRecord, sqlx::Error> {
        query_as::<Postgres, VersionRecord>(CREATE_VERSION_SQL)
            .bind(version.pacticipant_id.into_i64())
            .bind(version.number)
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_version(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        pacticipant: PacticipantId,
        number: &str,
    ) -> Result<Option<VersionRecord>, sqlx::Error> {
        query_as::<Postgres, VersionRecord>(FIND_VERSION_SQL)
            .bind(pacticipant.into_i64())
            .bind(number)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for VersionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: VersionId::from_i64(row.try_get("id")?),
            pacticipant_id: PacticipantId::from_i64(row.try_get("pacticipant_id")?),
            number: row.try_get("number")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
