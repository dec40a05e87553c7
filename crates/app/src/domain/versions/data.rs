//! Version Data

use crate::domain::pacticipants::records::PacticipantId;

/// New Version Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewVersion {
    /// Owning pacticipant.
    pub pacticipant_id: PacticipantId,

    /// Version number, unique per pacticipant.
    pub number: String,
}
