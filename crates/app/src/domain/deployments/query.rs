//! Deployed version queries
//!
//! [`DeployedVersionsQuery`] collects filters over `deployed_versions`; the
//! deployments service renders it into SQL when it runs. Filters are combined
//! with `AND`, and an empty query selects every row.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{Postgres, QueryBuilder};

use crate::{
    config::resources::NameMatching,
    domain::{
        deployments::{
            data::target_for_index,
            records::{DeployedVersionId, DeployedVersionUuid},
        },
        environments::records::EnvironmentId,
        pacticipants::records::PacticipantId,
        versions::records::VersionId,
    },
};

const SELECT_DEPLOYED_VERSIONS_SQL: &str = include_str!("sql/select_deployed_versions.sql");

#[derive(Debug, Clone, PartialEq, Eq)]
enum DeployedVersionsFilter {
    Id(DeployedVersionId),
    Uuid(DeployedVersionUuid),
    CurrentlyDeployed,
    Undeployed,
    Target(Option<String>),
    TargetForIndex(String),
    EnvironmentName(String),
    PacticipantName(String),
    Version(VersionId),
    Environment(EnvironmentId),
    Pacticipant(PacticipantId),
}

/// A composable filter over deployed versions.
///
/// ```ignore
/// let query = DeployedVersionsQuery::new()
///     .for_environment_name("production")
///     .currently_deployed()
///     .order_by_date_desc();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "queries do nothing until run by a deployments service"]
pub struct DeployedVersionsQuery {
    filters: Vec<DeployedVersionsFilter>,
    order_by_date_desc: bool,
    limit: Option<i64>,
}

impl DeployedVersionsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows referenced by a currently-deployed pointer.
    pub fn currently_deployed(self) -> Self {
        self.filter(DeployedVersionsFilter::CurrentlyDeployed)
    }

    /// Rows explicitly marked as undeployed.
    pub fn undeployed(self) -> Self {
        self.filter(DeployedVersionsFilter::Undeployed)
    }

    /// Exact target match; `None` matches rows without a target.
    pub fn for_target(self, target: Option<String>) -> Self {
        self.filter(DeployedVersionsFilter::Target(target))
    }

    pub fn for_environment_name(self, name: impl Into<String>) -> Self {
        self.filter(DeployedVersionsFilter::EnvironmentName(name.into()))
    }

    /// Rows whose pacticipant name matches the `LIKE` pattern `name`.
    pub fn for_pacticipant_name(self, name: impl Into<String>) -> Self {
        self.filter(DeployedVersionsFilter::PacticipantName(name.into()))
    }

    pub fn for_version_and_environment(
        self,
        version_id: VersionId,
        environment_id: EnvironmentId,
    ) -> Self {
        self.filter(DeployedVersionsFilter::Version(version_id))
            .for_environment(environment_id)
    }

    pub fn for_version_and_environment_and_target(
        self,
        version_id: VersionId,
        environment_id: EnvironmentId,
        target: Option<String>,
    ) -> Self {
        self.for_version_and_environment(version_id, environment_id)
            .for_target(target)
    }

    pub fn for_environment(self, environment_id: EnvironmentId) -> Self {
        self.filter(DeployedVersionsFilter::Environment(environment_id))
    }

    pub fn for_pacticipant(self, pacticipant_id: PacticipantId) -> Self {
        self.filter(DeployedVersionsFilter::Pacticipant(pacticipant_id))
    }

    pub fn for_uuid(self, uuid: DeployedVersionUuid) -> Self {
        self.filter(DeployedVersionsFilter::Uuid(uuid))
    }

    /// Newest first, with the id breaking ties between equal timestamps.
    pub fn order_by_date_desc(mut self) -> Self {
        self.order_by_date_desc = true;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn for_id(self, id: DeployedVersionId) -> Self {
        self.filter(DeployedVersionsFilter::Id(id))
    }

    /// Matches on the pointer key column, so `None` and `""` select the same rows.
    pub(crate) fn for_target_key(self, target: Option<&str>) -> Self {
        self.filter(DeployedVersionsFilter::TargetForIndex(target_for_index(
            target,
        )))
    }

    fn filter(mut self, filter: DeployedVersionsFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Render the `SELECT` returning full deployed version rows.
    pub(crate) fn select(&self, matching: NameMatching) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(SELECT_DEPLOYED_VERSIONS_SQL.trim_end());

        self.push_filters(&mut builder, matching);

        builder
    }

    /// Render an `UPDATE` stamping `undeployed_at` on matching rows that are
    /// still unset.
    pub(crate) fn record_undeployed(
        &self,
        matching: NameMatching,
        now: Timestamp,
    ) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("UPDATE deployed_versions SET undeployed_at = ");

        builder
            .push_bind(SqlxTimestamp::from(now))
            .push(", updated_at = ")
            .push_bind(SqlxTimestamp::from(now))
            .push(" WHERE undeployed_at IS NULL AND id IN (");

        self.push_id_select(&mut builder, matching);

        builder.push(")");

        builder
    }

    /// Render a `DELETE` of the pointers referencing matching rows.
    pub(crate) fn remove_currently_deployed(
        &self,
        matching: NameMatching,
    ) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(
            "DELETE FROM currently_deployed_version_ids WHERE deployed_version_id IN (",
        );

        self.push_id_select(&mut builder, matching);

        builder.push(")");

        builder
    }

    fn push_id_select(&self, builder: &mut QueryBuilder<'static, Postgres>, matching: NameMatching) {
        builder.push("SELECT dv.id FROM deployed_versions dv");

        self.push_filters(builder, matching);
    }

    fn push_filters(&self, builder: &mut QueryBuilder<'static, Postgres>, matching: NameMatching) {
        for (index, filter) in self.filters.iter().enumerate() {
            builder.push(if index == 0 { " WHERE " } else { " AND " });

            match filter {
                DeployedVersionsFilter::Id(id) => {
                    builder.push("dv.id = ").push_bind(id.into_i64());
                }
                DeployedVersionsFilter::Uuid(uuid) => {
                    builder.push("dv.uuid = ").push_bind(uuid.to_string());
                }
                DeployedVersionsFilter::CurrentlyDeployed => {
                    builder.push(
                        "dv.id IN (SELECT cdv.deployed_version_id FROM currently_deployed_version_ids cdv)",
                    );
                }
                DeployedVersionsFilter::Undeployed => {
                    builder.push("dv.undeployed_at IS NOT NULL");
                }
                DeployedVersionsFilter::Target(Some(target)) => {
                    builder.push("dv.target = ").push_bind(target.clone());
                }
                DeployedVersionsFilter::Target(None) => {
                    builder.push("dv.target IS NULL");
                }
                DeployedVersionsFilter::TargetForIndex(target) => {
                    builder
                        .push("dv.target_for_index = ")
                        .push_bind(target.clone());
                }
                DeployedVersionsFilter::EnvironmentName(name) => {
                    builder
                        .push("dv.environment_id IN (SELECT e.id FROM environments e WHERE e.name = ")
                        .push_bind(name.clone())
                        .push(")");
                }
                DeployedVersionsFilter::PacticipantName(name) => {
                    let operator = match matching {
                        NameMatching::CaseSensitive => " LIKE ",
                        NameMatching::CaseInsensitive => " ILIKE ",
                    };

                    builder
                        .push("dv.pacticipant_id IN (SELECT p.id FROM pacticipants p WHERE p.name")
                        .push(operator)
                        .push_bind(name.clone())
                        .push(")");
                }
                DeployedVersionsFilter::Version(version_id) => {
                    builder
                        .push("dv.version_id = ")
                        .push_bind(version_id.into_i64());
                }
                DeployedVersionsFilter::Environment(environment_id) => {
                    builder
                        .push("dv.environment_id = ")
                        .push_bind(environment_id.into_i64());
                }
                DeployedVersionsFilter::Pacticipant(pacticipant_id) => {
                    builder
                        .push("dv.pacticipant_id = ")
                        .push_bind(pacticipant_id.into_i64());
                }
            }
        }

        if self.order_by_date_desc {
            builder.push(" ORDER BY dv.created_at DESC, dv.id DESC");
        }

        if let Some(limit) = self.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn where_clause(query: &DeployedVersionsQuery, matching: NameMatching) -> String {
        let builder = query.select(matching);
        let sql = builder.sql();

        sql.split_once("JOIN versions v ON v.id = dv.version_id")
            .map(|(_, rest)| rest.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn empty_query_has_no_where_clause() {
        let query = DeployedVersionsQuery::new();

        assert_eq!(where_clause(&query, NameMatching::CaseSensitive), "");
    }

    #[test]
    fn select_loads_version_number_and_pointer_flag() {
        let builder = DeployedVersionsQuery::new().select(NameMatching::CaseSensitive);

        assert!(builder.sql().contains("v.number AS version_number"));
        assert!(builder.sql().contains(") AS currently_deployed"));
    }

    #[test]
    fn currently_deployed_selects_pointer_ids() {
        let query = DeployedVersionsQuery::new().currently_deployed();

        assert_eq!(
            where_clause(&query, NameMatching::CaseSensitive),
            " WHERE dv.id IN (SELECT cdv.deployed_version_id FROM currently_deployed_version_ids cdv)"
        );
    }

    #[test]
    fn undeployed_requires_undeployed_at() {
        let query = DeployedVersionsQuery::new().undeployed();

        assert_eq!(
            where_clause(&query, NameMatching::CaseSensitive),
            " WHERE dv.undeployed_at IS NOT NULL"
        );
    }

    #[test]
    fn missing_target_matches_null() {
        let query = DeployedVersionsQuery::new().for_target(None);

        assert_eq!(
            where_clause(&query, NameMatching::CaseSensitive),
            " WHERE dv.target IS NULL"
        );
    }

    #[test]
    fn version_environment_and_target_are_bound_in_order() {
        let query = DeployedVersionsQuery::new().for_version_and_environment_and_target(
            VersionId::from_i64(1),
            EnvironmentId::from_i64(2),
            Some("blue".to_string()),
        );

        assert_eq!(
            where_clause(&query, NameMatching::CaseSensitive),
            " WHERE dv.version_id = $1 AND dv.environment_id = $2 AND dv.target = $3"
        );
    }

    #[test]
    fn pacticipant_name_uses_like_when_case_sensitive() {
        let query = DeployedVersionsQuery::new().for_pacticipant_name("Foo%");

        assert_eq!(
            where_clause(&query, NameMatching::CaseSensitive),
            " WHERE dv.pacticipant_id IN (SELECT p.id FROM pacticipants p WHERE p.name LIKE $1)"
        );
    }

    #[test]
    fn pacticipant_name_uses_ilike_when_case_insensitive() {
        let query = DeployedVersionsQuery::new().for_pacticipant_name("foo");

        assert_eq!(
            where_clause(&query, NameMatching::CaseInsensitive),
            " WHERE dv.pacticipant_id IN (SELECT p.id FROM pacticipants p WHERE p.name ILIKE $1)"
        );
    }

    #[test]
    fn environment_name_selects_environment_ids() {
        let query = DeployedVersionsQuery::new().for_environment_name("production");

        assert_eq!(
            where_clause(&query, NameMatching::CaseSensitive),
            " WHERE dv.environment_id IN (SELECT e.id FROM environments e WHERE e.name = $1)"
        );
    }

    #[test]
    fn order_and_limit_follow_filters() {
        let query = DeployedVersionsQuery::new()
            .currently_deployed()
            .for_pacticipant(PacticipantId::from_i64(1))
            .for_environment(EnvironmentId::from_i64(2))
            .order_by_date_desc()
            .limit(1);

        assert!(
            where_clause(&query, NameMatching::CaseSensitive).ends_with(
                " AND dv.pacticipant_id = $1 AND dv.environment_id = $2 ORDER BY dv.created_at DESC, dv.id DESC LIMIT $3"
            )
        );
    }

    #[test]
    fn record_undeployed_only_touches_unset_rows() {
        let query = DeployedVersionsQuery::new().for_environment(EnvironmentId::from_i64(7));
        let builder = query.record_undeployed(NameMatching::CaseSensitive, Timestamp::now());

        assert_eq!(
            builder.sql(),
            "UPDATE deployed_versions SET undeployed_at = $1, updated_at = $2 \
             WHERE undeployed_at IS NULL AND id IN \
             (SELECT dv.id FROM deployed_versions dv WHERE dv.environment_id = $3)"
        );
    }

    #[test]
    fn remove_currently_deployed_deletes_pointers_for_matching_rows() {
        let query = DeployedVersionsQuery::new().for_target_key(None);
        let builder = query.remove_currently_deployed(NameMatching::CaseSensitive);

        assert_eq!(
            builder.sql(),
            "DELETE FROM currently_deployed_version_ids WHERE deployed_version_id IN \
             (SELECT dv.id FROM deployed_versions dv WHERE dv.target_for_index = $1)"
        );
    }
}
