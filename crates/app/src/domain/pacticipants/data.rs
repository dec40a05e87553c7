//! Pacticipant Data

/// New Pacticipant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPacticipant {
    /// Unique pacticipant name.
    pub name: String,

    /// Optional human-readable name.
    pub display_name: Option<String>,
}
