//! Deployed version persistence for a contract-testing broker.
//!
//! Records which pacticipant versions are deployed to which environments, and
//! keeps a pointer per `(pacticipant, environment, version, target)` key to the
//! deployment that is current for it.

pub mod config;
pub mod database;
pub mod domain;
pub mod logging;

pub use domain::{deployments, environments, pacticipants, versions};

#[cfg(test)]
mod test;

mod ids;
mod uuids;
