use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct MonitoringConfig {
    /// Dump the prometheus text exposition once the scenario finishes
    #[serde(default)]
    pub print_metrics: bool,
}
