use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing::warn;

use crate::cluster::ClusterControl;
use crate::cluster::ClusterMember;
use crate::ProvisioningError;
use crate::ScenarioError;

/// Takes the designated zero-token member out of the live cluster
pub struct LifecycleDriver {
    control: Arc<dyn ClusterControl>,
    timeout: Duration,
}

impl LifecycleDriver {
    pub fn new(
        control: Arc<dyn ClusterControl>,
        timeout: Duration,
    ) -> Self {
        Self { control, timeout }
    }

    /// Gracefully stops `member`, waiting at most the configured timeout.
    /// Ring-participating members are refused.
    pub async fn stop(
        &self,
        member: &ClusterMember,
    ) -> std::result::Result<(), ScenarioError> {
        let lifecycle_error = |source| ScenarioError::Lifecycle {
            member: member.id,
            source,
        };

        if !member.is_zero_token() {
            return Err(lifecycle_error(ProvisioningError::StopFailed {
                member: member.id,
                reason: "member participates in the ring".to_string(),
            }));
        }

        info!("stopping {}", member);
        match tokio::time::timeout(self.timeout, self.control.stop_member_gracefully(member.id)).await {
            Ok(Ok(())) => {
                info!("{} stopped", member);
                Ok(())
            }
            Ok(Err(e)) => Err(lifecycle_error(e)),
            Err(_) => {
                warn!("stopping {} timed out after {:?}", member, self.timeout);
                Err(lifecycle_error(ProvisioningError::Timeout {
                    operation: "stop_member_gracefully",
                    duration: self.timeout,
                }))
            }
        }
    }
}
