//! Cluster-control collaborator interface.
//!
//! Members are owned by the cluster-control service; the scenario only keeps
//! their identifiers and addresses.

use std::fmt;
use std::net::SocketAddr;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::ProvisioningError;

pub type MemberId = u32;

/// Datacenter/rack labels a member is provisioned with
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlacementAttrs {
    pub datacenter: String,
    pub rack: String,
}

impl PlacementAttrs {
    pub fn new(
        datacenter: impl Into<String>,
        rack: impl Into<String>,
    ) -> Self {
        Self {
            datacenter: datacenter.into(),
            rack: rack.into(),
        }
    }
}

impl fmt::Display for PlacementAttrs {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}/{}", self.datacenter, self.rack)
    }
}

/// One storage-process instance of the cluster under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterMember {
    pub id: MemberId,
    /// Client-facing address used to open coordinator sessions
    pub address: SocketAddr,
    /// `false` means the member owns no tokens (zero-token member)
    pub participates_in_ring: bool,
    pub placement: PlacementAttrs,
}

impl ClusterMember {
    #[inline]
    pub fn is_zero_token(&self) -> bool {
        !self.participates_in_ring
    }
}

impl fmt::Display for ClusterMember {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "member {} ({}, {}, {})",
            self.id,
            self.address,
            self.placement,
            if self.participates_in_ring { "ring" } else { "zero-token" }
        )
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterControl: Send + Sync + 'static {
    /// Provision a member and wait until it has joined
    async fn add_member(
        &self,
        placement: PlacementAttrs,
        participates_in_ring: bool,
    ) -> std::result::Result<ClusterMember, ProvisioningError>;

    /// Stop a member gracefully, returning once the process has exited
    async fn stop_member_gracefully(
        &self,
        member_id: MemberId,
    ) -> std::result::Result<(), ProvisioningError>;
}
