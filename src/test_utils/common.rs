use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::client::Coordinator;
use crate::client::MockCoordinator;
use crate::cluster::ClusterMember;
use crate::cluster::MemberId;
use crate::cluster::PlacementAttrs;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for unit test.");
}

pub(crate) fn addr(id: MemberId) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, id as u8], 9042))
}

pub(crate) fn member(
    id: MemberId,
    participates_in_ring: bool,
) -> ClusterMember {
    ClusterMember {
        id,
        address: addr(id),
        participates_in_ring,
        placement: PlacementAttrs::new("dc1", format!("r{id}")),
    }
}

/// A coordinator mock that reports `address` and expects no statements
pub(crate) fn mock_coordinator(address: SocketAddr) -> MockCoordinator {
    let mut coordinator = MockCoordinator::new();
    coordinator.expect_address().return_const(address);
    coordinator
}

pub(crate) fn shared(coordinator: MockCoordinator) -> Arc<dyn Coordinator> {
    Arc::new(coordinator)
}
