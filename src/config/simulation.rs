use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;
use crate::DEFAULT_CQL_PORT;

/// Deliberate placement bugs the in-process cluster can reproduce
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlacementFault {
    #[default]
    None,

    /// Zero-token members are handed tokens and tablets like ring members
    ZeroTokenReplicas,
}

/// Shape of the in-process cluster used by the binary and integration tests
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Tokens owned by each ring-participating member
    #[serde(default = "default_num_tokens")]
    pub num_tokens: u32,

    /// Tablets allocated per table in tablets-enabled keyspaces
    #[serde(default = "default_initial_tablets")]
    pub initial_tablets: u32,

    #[serde(default = "default_cql_port")]
    pub cql_port: u16,

    #[serde(default)]
    pub fault: PlacementFault,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_tokens: default_num_tokens(),
            initial_tablets: default_initial_tablets(),
            cql_port: default_cql_port(),
            fault: PlacementFault::None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_tokens == 0 {
            return Err(Error::InvalidConfig("num_tokens must be greater than 0".into()));
        }
        if self.initial_tablets == 0 {
            return Err(Error::InvalidConfig("initial_tablets must be greater than 0".into()));
        }
        if self.cql_port == 0 {
            return Err(Error::InvalidConfig("cql_port must specify a non-zero port".into()));
        }
        Ok(())
    }
}

fn default_num_tokens() -> u32 {
    16
}
fn default_initial_tablets() -> u32 {
    8
}
fn default_cql_port() -> u16 {
    DEFAULT_CQL_PORT
}
