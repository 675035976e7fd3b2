//! Zero-token replication verification.
//!
//! Provisions a cluster with ring-participating and zero-token members, runs
//! every replication strategy x tablets combination through both kinds of
//! coordinator, and proves with full-consistency reads, before and after the
//! zero-token member is stopped, that it never held a replica.
//!
//! The collaborators ([`ClusterControl`], [`Connector`], [`NameGenerator`])
//! are traits; [`SimCluster`] is an in-process implementation of the first two.

pub mod client;
pub mod cluster;
pub mod config;
mod constants;
mod errors;
pub mod metrics;
pub mod naming;
pub mod scenario;
pub mod sim;

pub use client::Connector;
pub use client::Coordinator;
pub use cluster::ClusterControl;
pub use cluster::ClusterMember;
pub use config::Settings;
pub use constants::*;
pub use errors::*;
pub use naming::NameGenerator;
pub use naming::NanoidNames;
pub use scenario::run_scenario;
pub use scenario::Scenario;
pub use scenario::ScenarioReport;
pub use scenario::ScenarioState;
pub use sim::SimCluster;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
