//! Resource Names Config

use clap::Args;

/// How resource names (pacticipant names) are compared in lookups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NameMatching {
    /// `LIKE`: exact case.
    #[default]
    CaseSensitive,

    /// `ILIKE`: case folded.
    CaseInsensitive,
}

/// Resource name settings.
#[derive(Debug, Args)]
pub struct ResourceNamesConfig {
    /// Compare pacticipant names case-sensitively
    #[arg(
        long,
        env = "USE_CASE_SENSITIVE_RESOURCE_NAMES",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub use_case_sensitive_resource_names: bool,
}

impl ResourceNamesConfig {
    #[must_use]
    pub fn name_matching(&self) -> NameMatching {
        if self.use_case_sensitive_resource_names {
            NameMatching::CaseSensitive
        } else {
            NameMatching::CaseInsensitive
        }
    }
}
