//! Pacticipants Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    config::resources::NameMatching,
    domain::pacticipants::{
        data::NewPacticipant,
        records::{PacticipantId, PacticipantRecord},
    },
};

const CREATE_PACTICIPANT_SQL: &str = include_str!("sql/create_pacticipant.sql");
const FIND_PACTICIPANT_BY_NAME_SQL: &str = include_str!("sql/find_pacticipant_by_name.sql");
const FIND_PACTICIPANT_BY_NAME_IGNORING_CASE_SQL: &str =
    include_str!("sql/find_pacticipant_by_name_ignoring_case.sql");

#[derive(Debug, Clone, Default)]
/// PostgreSQL-backed pacticipants repository.
pub(crate) struct PgPacticipantsRepository;

impl PgPacticipantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_pacticipant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        pacticipant: NewPacticipant,
        now: Timestamp,
    ) -> Result<PacticipantRecord, sqlx::Error> {
        query_as::<Postgres, PacticipantRecord>(CREATE_PACTICIPANT_SQL)
            .bind(pacticipant.name)
            .bind(pacticipant.display_name)
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a pacticipant whose name matches the `LIKE` pattern `name`.
    pub(crate) async fn find_pacticipant_by_name(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        matching: NameMatching,
    ) -> Result<Option<PacticipantRecord>, sqlx::Error> {
        let sql = match matching {
            NameMatching::CaseSensitive => FIND_PACTICIPANT_BY_NAME_SQL,
            NameMatching::CaseInsensitive => FIND_PACTICIPANT_BY_NAME_IGNORING_CASE_SQL,
        };

        query_as::<Postgres, PacticipantRecord>(sql)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PacticipantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: PacticipantId::from_i64(row.try_get("id")?),
            name: row.try_get("name")?,
            display_name: row.try_get("display_name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
