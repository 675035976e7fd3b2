use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tracing::trace;

use crate::client::Consistency;
use crate::client::Coordinator;
use crate::client::QueryResult;
use crate::client::RoutingPolicy;
use crate::client::Statement;
use crate::sim::SimCluster;
use crate::QueryError;

/// Client session against a [`SimCluster`].
///
/// Requests rotate over the live members the routing policy allows. A
/// pinned session whose only host is down fails with `NoHostAvailable`
/// instead of falling back to another member.
pub struct SimSession {
    cluster: SimCluster,
    address: SocketAddr,
    policy: RoutingPolicy,
    next: AtomicUsize,
}

impl SimSession {
    pub(crate) fn new(
        cluster: SimCluster,
        address: SocketAddr,
        policy: RoutingPolicy,
    ) -> Self {
        Self {
            cluster,
            address,
            policy,
            next: AtomicUsize::new(0),
        }
    }

    fn allowed_hosts(&self) -> Vec<SocketAddr> {
        match &self.policy {
            RoutingPolicy::WhiteList(hosts) => hosts.clone(),
            RoutingPolicy::RoundRobin => self.cluster.members().into_iter().map(|m| m.address).collect(),
        }
    }
}

#[async_trait]
impl Coordinator for SimSession {
    fn address(&self) -> SocketAddr {
        self.address
    }

    async fn execute(
        &self,
        statement: &Statement,
        consistency: Consistency,
    ) -> std::result::Result<QueryResult, QueryError> {
        let eligible = self.cluster.eligible_coordinators(&self.policy);
        if eligible.is_empty() {
            return Err(QueryError::NoHostAvailable(self.allowed_hosts()));
        }
        let coordinator = eligible[self.next.fetch_add(1, Ordering::Relaxed) % eligible.len()];
        trace!("[{}] routing to member {}", self.address, coordinator);

        self.cluster.apply(coordinator, statement, consistency)
    }
}
