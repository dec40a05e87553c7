//! Deployments
//!
//! A deployed version records that a pacticipant version went out to an
//! environment, optionally on a named target within it. Alongside each row a
//! pointer in `currently_deployed_version_ids` marks the latest deployment for a
//! `(pacticipant, environment, version, target)` key.

pub mod data;
pub mod errors;
pub mod query;
pub mod records;
mod repository;
pub mod service;

pub use errors::DeploymentsServiceError;
pub use query::DeployedVersionsQuery;
pub use service::*;
