//! Environment Records

use jiff::Timestamp;

use crate::{ids::TypedId, uuids::TypedUuid};

/// Environment primary key
pub type EnvironmentId = TypedId<EnvironmentRecord>;

/// Environment UUID
pub type EnvironmentUuid = TypedUuid<EnvironmentRecord>;

/// Environment Record
#[derive(Debug, Clone)]
pub struct EnvironmentRecord {
    /// Surrogate key.
    pub id: EnvironmentId,

    /// Externally visible identifier.
    pub uuid: EnvironmentUuid,

    /// Unique environment name.
    pub name: String,

    /// Optional human-readable name.
    pub display_name: Option<String>,

    /// Whether deployments here serve real users.
    pub production: bool,

    /// Creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}
