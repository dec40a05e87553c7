//! Broker domain concerns

pub mod deployments;
pub mod environments;
pub mod pacticipants;
pub mod versions;
