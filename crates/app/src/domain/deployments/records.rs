//! Deployed Version Records

use jiff::Timestamp;

use crate::{
    domain::{
        environments::records::EnvironmentId, pacticipants::records::PacticipantId,
        versions::records::VersionId,
    },
    ids::TypedId,
    uuids::TypedUuid,
};

/// Deployed version primary key
pub type DeployedVersionId = TypedId<DeployedVersionRecord>;

/// Deployed version UUID
pub type DeployedVersionUuid = TypedUuid<DeployedVersionRecord>;

/// Deployed Version Record
#[derive(Debug, Clone)]
pub struct DeployedVersionRecord {
    pub id: DeployedVersionId,
    pub uuid: DeployedVersionUuid,
    pub version_id: VersionId,
    pub pacticipant_id: PacticipantId,
    pub environment_id: EnvironmentId,
    pub target: Option<String>,
    pub target_for_index: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,

    /// Set once the deployment has been explicitly marked as gone.
    pub undeployed_at: Option<Timestamp>,

    /// Number of the deployed version, loaded with the row.
    pub version_number: String,

    /// Whether a currently-deployed pointer references this row.
    pub currently_deployed: bool,
}

impl DeployedVersionRecord {
    #[must_use]
    pub fn currently_deployed(&self) -> bool {
        self.currently_deployed
    }

    #[must_use]
    pub fn version_number(&self) -> &str {
        &self.version_number
    }

    #[must_use]
    pub fn is_undeployed(&self) -> bool {
        self.undeployed_at.is_some()
    }
}

/// Currently Deployed Version Pointer Record
#[derive(Debug, Clone)]
pub struct CurrentlyDeployedVersionIdRecord {
    pub pacticipant_id: PacticipantId,
    pub environment_id: EnvironmentId,
    pub version_id: VersionId,
    pub target_for_index: String,
    pub deployed_version_id: DeployedVersionId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
