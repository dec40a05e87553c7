//! Version Records

use jiff::Timestamp;

use crate::{domain::pacticipants::records::PacticipantId, ids::TypedId};

/// Version primary key
pub type VersionId = TypedId<VersionRecord>;

/// Version Record
#[derive(Debug, Clone)]
pub struct VersionRecord {
    pub id: VersionId,
    pub pacticipant_id: PacticipantId,
    pub number: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
