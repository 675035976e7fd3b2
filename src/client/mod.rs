//! Query-execution collaborator interface
//!
//! Provides the pieces the scenario needs to talk to the storage engine:
//! - [`Connector`] - Opens a [`Coordinator`] session pinned by a [`RoutingPolicy`]
//! - [`Coordinator`] - Executes typed [`Statement`]s at a [`Consistency`] level
//! - [`Record`] / [`QueryResult`] - Fixed-shape `(pk, v)` rows
//!
//! # Basic Usage
//! ```ignore
//! let session = connector
//!     .connect(member.address, RoutingPolicy::pinned(member.address))
//!     .await?;
//! let rows = execute_with_timeout(
//!     session.as_ref(),
//!     &Statement::select_all(keyspace, table),
//!     Consistency::All,
//!     Duration::from_secs(10),
//! )
//! .await?
//! .into_rows();
//! ```

mod consistency;
mod record;
mod statement;

pub use consistency::*;
pub use record::*;
pub use statement::*;


use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tracing::warn;

use crate::QueryError;

/// Which hosts a session may send requests to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingPolicy {
    /// Round robin restricted to the listed hosts
    WhiteList(Vec<SocketAddr>),
    /// Round robin over every live member
    RoundRobin,
}

impl RoutingPolicy {
    /// Route every request through a single host
    pub fn pinned(address: SocketAddr) -> Self {
        RoutingPolicy::WhiteList(vec![address])
    }
}

/// A client session whose requests are coordinated by the hosts of its routing policy
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Coordinator: Send + Sync {
    /// Address the session was opened against
    fn address(&self) -> SocketAddr;

    async fn execute(
        &self,
        statement: &Statement,
        consistency: Consistency,
    ) -> std::result::Result<QueryResult, QueryError>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(
        &self,
        address: SocketAddr,
        policy: RoutingPolicy,
    ) -> std::result::Result<Arc<dyn Coordinator>, QueryError>;
}

/// Executes `statement`, failing with [`QueryError::Timeout`] once `timeout` elapses
pub async fn execute_with_timeout(
    coordinator: &dyn Coordinator,
    statement: &Statement,
    consistency: Consistency,
    timeout: Duration,
) -> std::result::Result<QueryResult, QueryError> {
    match tokio::time::timeout(timeout, coordinator.execute(statement, consistency)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                "[{}] `{}` timed out after {:?}",
                coordinator.address(),
                statement,
                timeout
            );
            Err(QueryError::Timeout {
                coordinator: coordinator.address(),
                duration: timeout,
            })
        }
    }
}
