//! Pacticipant Records

use jiff::Timestamp;

use crate::ids::TypedId;

/// Pacticipant primary key
pub type PacticipantId = TypedId<PacticipantRecord>;

/// Pacticipant Record
#[derive(Debug, Clone)]
pub struct PacticipantRecord {
    /// Surrogate key.
    pub id: PacticipantId,

    /// Unique pacticipant name.
    pub name: String,

    /// Optional human-readable name.
    pub display_name: Option<String>,

    /// Creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,
}
