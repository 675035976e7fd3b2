//! Zero-Token Verification Error Hierarchy
//!
//! Errors are grouped by the collaborator that produced them (cluster control,
//! query execution) and by the scenario phase that surfaced them. Every error
//! is fatal to the scenario: nothing in this crate retries.

use std::net::SocketAddr;
use std::time::Duration;

use config::ConfigError;

use crate::client::Consistency;
use crate::client::Record;
use crate::client::ReplicationStrategy;
use crate::cluster::MemberId;
use crate::scenario::Pass;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration source could not be read or deserialized
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration loaded but violates a validation rule
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Cluster-control failures outside of a running scenario
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),

    /// Query-execution failures outside of a running scenario
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Scenario failures, always carrying the keyspace/pass context
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

/// Cluster-control collaborator failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProvisioningError {
    /// A requested member never joined the cluster
    #[error("Member failed to join {datacenter}/{rack}: {reason}")]
    JoinFailed {
        datacenter: String,
        rack: String,
        reason: String,
    },

    #[error("Unknown member {0}")]
    UnknownMember(MemberId),

    #[error("Member {0} is already stopped")]
    AlreadyStopped(MemberId),

    /// Graceful stop was refused or aborted by the member
    #[error("Member {member} failed to stop: {reason}")]
    StopFailed { member: MemberId, reason: String },

    #[error("{operation} timed out after {duration:?}")]
    Timeout {
        operation: &'static str,
        duration: Duration,
    },
}

/// Query-execution collaborator failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// No host in the routing policy can coordinate the request
    #[error("No host available among {0:?}")]
    NoHostAvailable(Vec<SocketAddr>),

    #[error("Connection refused by {0}")]
    ConnectionRefused(SocketAddr),

    #[error("Request through {coordinator} timed out after {duration:?}")]
    Timeout {
        coordinator: SocketAddr,
        duration: Duration,
    },

    /// Not enough live replicas to satisfy the consistency level
    #[error("Cannot achieve consistency level {consistency}: {required} required but only {alive} alive")]
    Unavailable {
        consistency: Consistency,
        required: usize,
        alive: usize,
    },

    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    #[error("Invalid identifier {0:?}")]
    InvalidIdentifier(String),

    #[error("Keyspace {0} already exists")]
    KeyspaceExists(String),

    #[error("Keyspace {0} does not exist")]
    UnknownKeyspace(String),

    #[error("Table {keyspace}.{table} does not exist")]
    UnknownTable { keyspace: String, table: String },
}

/// Scenario failures, naming the offending matrix cell and pass
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Settings handed to the scenario fail validation; nothing was provisioned
    #[error("Invalid scenario settings: {0}")]
    InvalidSettings(String),

    #[error("Provisioning failed: {0}")]
    Provisioning(#[source] ProvisioningError),

    /// The topology cannot supply both a ring member and a zero-token member
    #[error("No {0} member available to coordinate")]
    NoCoordinator(&'static str),

    #[error("Connecting to {address} failed: {source}")]
    Connect {
        address: SocketAddr,
        #[source]
        source: QueryError,
    },

    #[error("Creating {keyspace} failed: {source}")]
    Ddl {
        keyspace: String,
        #[source]
        source: QueryError,
    },

    #[error("Insert of key {key} into {keyspace} via {coordinator} failed: {source}")]
    Write {
        keyspace: String,
        key: i32,
        coordinator: SocketAddr,
        #[source]
        source: QueryError,
    },

    #[error("Pass {pass} read of {keyspace} ({strategy}, tablets={tablets}) failed: {source}")]
    Read {
        keyspace: String,
        strategy: ReplicationStrategy,
        tablets: bool,
        pass: Pass,
        #[source]
        source: QueryError,
    },

    /// Returned rows differ from the expected complete set
    #[error(
        "Pass {pass} mismatch in {keyspace} ({strategy}, tablets={tablets}) at CL={consistency}: \
         expected {expected_len} rows, got {actual_len}; first difference: expected {expected:?}, got {actual:?}"
    )]
    Mismatch {
        keyspace: String,
        strategy: ReplicationStrategy,
        tablets: bool,
        pass: Pass,
        consistency: Consistency,
        expected_len: usize,
        actual_len: usize,
        expected: Option<Record>,
        actual: Option<Record>,
    },

    #[error("Stopping member {member} failed: {source}")]
    Lifecycle {
        member: MemberId,
        #[source]
        source: ProvisioningError,
    },
}
