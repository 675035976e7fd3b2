use serde::Deserialize;
use serde::Serialize;

use crate::client::Consistency;
use crate::Error;
use crate::Result;
use crate::DEFAULT_KEYSPACE_PREFIX;
use crate::DEFAULT_POPULATION_SIZE;
use crate::DEFAULT_REPLICATION_FACTOR;
use crate::DEFAULT_TABLE_NAME;

/// Parameters of the keyspace matrix and its population
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScenarioConfig {
    /// Rows written per keyspace; keys are `0..population_size`
    #[serde(default = "default_population_size")]
    pub population_size: u32,

    /// Replication factor requested for every keyspace
    #[serde(default = "default_replication_factor")]
    pub replication_factor: u32,

    /// Prefix handed to the name generator
    #[serde(default = "default_keyspace_prefix")]
    pub keyspace_prefix: String,

    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Consistency level used for inserts. Reads are always issued at ALL.
    #[serde(default = "default_write_consistency")]
    pub write_consistency: Consistency,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            replication_factor: default_replication_factor(),
            keyspace_prefix: default_keyspace_prefix(),
            table_name: default_table_name(),
            write_consistency: default_write_consistency(),
        }
    }
}

impl ScenarioConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::InvalidConfig("population_size must be greater than 0".into()));
        }
        if self.population_size > i32::MAX as u32 {
            return Err(Error::InvalidConfig(format!(
                "population_size {} does not fit the int key column",
                self.population_size
            )));
        }
        if self.replication_factor == 0 {
            return Err(Error::InvalidConfig("replication_factor must be greater than 0".into()));
        }
        if self.keyspace_prefix.is_empty() {
            return Err(Error::InvalidConfig("keyspace_prefix cannot be empty".into()));
        }
        if self.table_name.is_empty() {
            return Err(Error::InvalidConfig("table_name cannot be empty".into()));
        }
        Ok(())
    }
}

fn default_population_size() -> u32 {
    DEFAULT_POPULATION_SIZE
}
fn default_replication_factor() -> u32 {
    DEFAULT_REPLICATION_FACTOR
}
fn default_keyspace_prefix() -> String {
    DEFAULT_KEYSPACE_PREFIX.to_string()
}
fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}
fn default_write_consistency() -> Consistency {
    Consistency::One
}
