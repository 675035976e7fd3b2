use serde::Deserialize;
use serde::Serialize;

use crate::cluster::PlacementAttrs;
use crate::Error;
use crate::Result;
use crate::DEFAULT_DATACENTER;

/// One member requested from cluster control at scenario start
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MemberConfig {
    pub rack: String,

    /// `false` provisions a zero-token member
    #[serde(default = "default_join_ring")]
    pub join_ring: bool,
}

/// Cluster layout provisioned before the matrix runs
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TopologyConfig {
    #[serde(default = "default_datacenter")]
    pub datacenter: String,

    /// Members in provisioning order
    #[serde(default = "default_members")]
    pub members: Vec<MemberConfig>,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            datacenter: default_datacenter(),
            members: default_members(),
        }
    }
}

impl TopologyConfig {
    /// Validates that the layout can supply both coordinators
    /// # Errors
    /// Returns `Error::InvalidConfig` if any configuration rules are violated
    pub fn validate(&self) -> Result<()> {
        if self.datacenter.is_empty() {
            return Err(Error::InvalidConfig("datacenter cannot be empty".into()));
        }
        if let Some(position) = self.members.iter().position(|m| m.rack.is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "member #{} has an empty rack",
                position + 1
            )));
        }
        if !self.members.iter().any(|m| m.join_ring) {
            return Err(Error::InvalidConfig(
                "topology must contain at least one ring-participating member".into(),
            ));
        }
        if !self.members.iter().any(|m| !m.join_ring) {
            return Err(Error::InvalidConfig(
                "topology must contain at least one zero-token member".into(),
            ));
        }
        Ok(())
    }

    pub fn placement_of(
        &self,
        member: &MemberConfig,
    ) -> PlacementAttrs {
        PlacementAttrs::new(&self.datacenter, &member.rack)
    }
}

fn default_join_ring() -> bool {
    true
}
fn default_datacenter() -> String {
    DEFAULT_DATACENTER.to_string()
}
fn default_members() -> Vec<MemberConfig> {
    vec![
        MemberConfig {
            rack: "r1".to_string(),
            join_ring: true,
        },
        MemberConfig {
            rack: "r2".to_string(),
            join_ring: false,
        },
        MemberConfig {
            rack: "r3".to_string(),
            join_ring: true,
        },
    ]
}
