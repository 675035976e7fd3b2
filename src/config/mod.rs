//! Configuration management for the zero-token verification scenario.
//!
//! Provides hierarchical configuration loading from multiple sources with priority:
//! 1. Default values (hardcoded)
//! 2. Config file (explicit path, or `RINGCHECK_CONFIG`)
//! 3. Environment variables (highest priority), e.g.
//!    `RINGCHECK__SCENARIO__POPULATION_SIZE=200`
//!

mod monitoring;
mod scenario;
mod simulation;
mod timeouts;
mod topology;
pub use monitoring::*;
pub use scenario::*;
pub use simulation::*;
pub use timeouts::*;
pub use topology::*;


//---
use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::constants::ENV_CONFIG_PATH;
use crate::constants::ENV_PREFIX;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Settings {
    /// Keyspace matrix and population parameters
    #[serde(default)]
    pub scenario: ScenarioConfig,
    /// Members requested from cluster control
    #[serde(default)]
    pub topology: TopologyConfig,
    /// Per-operation deadlines
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// In-process cluster parameters
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

impl Settings {
    /// Load configuration from multiple sources with priority:
    /// 1. Hardcoded defaults
    /// 2. `config_path`, falling back to the `RINGCHECK_CONFIG` variable
    /// 3. `RINGCHECK__*` environment variables
    ///
    /// # Returns
    /// Merged and validated configuration
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // 1. Defaults come from the serde `default` attributes
        let mut config = Config::builder();

        // 2. Config file
        let path = config_path.map(str::to_owned).or_else(|| env::var(ENV_CONFIG_PATH).ok());
        if let Some(path) = path {
            debug!("loading config file {}", path);
            config = config.add_source(File::with_name(&path).required(true));
        }

        // 3. Environment variables (highest priority)
        config = config.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: Settings = config.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.scenario.validate()?;
        self.topology.validate()?;
        self.timeouts.validate()?;
        self.simulation.validate()?;
        Ok(())
    }
}
