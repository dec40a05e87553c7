//! Environment Data

use crate::domain::environments::records::EnvironmentUuid;

/// New Environment Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewEnvironment {
    /// Externally visible identifier.
    pub uuid: EnvironmentUuid,

    /// Unique environment name, e.g. `production`.
    pub name: String,

    /// Optional human-readable name.
    pub display_name: Option<String>,

    /// Whether deployments here serve real users.
    pub production: bool,
}
