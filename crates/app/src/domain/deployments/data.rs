//! Deployed Version Data

use jiff::Timestamp;

use crate::domain::{
    deployments::records::DeployedVersionUuid, environments::records::EnvironmentId,
    pacticipants::records::PacticipantId, versions::records::VersionId,
};

/// New Deployed Version Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewDeployedVersion {
    pub uuid: DeployedVersionUuid,
    pub version_id: VersionId,
    pub pacticipant_id: PacticipantId,
    pub environment_id: EnvironmentId,

    /// Optional label for where in the environment it runs, e.g. a node name.
    pub target: Option<String>,

    /// Deployment time; defaults to the insert time.
    pub created_at: Option<Timestamp>,
}

impl NewDeployedVersion {
    /// Fill in the derived columns written on insert.
    #[must_use]
    pub fn prepare(self, now: Timestamp) -> PreparedDeployedVersion {
        PreparedDeployedVersion {
            target_for_index: target_for_index(self.target.as_deref()),
            uuid: self.uuid,
            version_id: self.version_id,
            pacticipant_id: self.pacticipant_id,
            environment_id: self.environment_id,
            target: self.target,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}

/// A deployed version ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDeployedVersion {
    pub uuid: DeployedVersionUuid,
    pub version_id: VersionId,
    pub pacticipant_id: PacticipantId,
    pub environment_id: EnvironmentId,
    pub target: Option<String>,

    /// `target` with the empty string standing in for `NULL`.
    pub target_for_index: String,

    pub created_at: Timestamp,
}

/// Non-null form of a target, usable as a unique index column.
#[must_use]
pub fn target_for_index(target: Option<&str>) -> String {
    target.unwrap_or_default().to_string()
}
