use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Upper bounds on every remote call the scenario awaits.
///
/// Exceeding one fails the scenario; there is no retry budget.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Cluster-control `add_member` (unit: milliseconds)
    #[serde(default = "default_add_member_timeout_ms")]
    pub add_member_timeout_ms: u64,

    /// Cluster-control graceful stop (unit: milliseconds)
    #[serde(default = "default_stop_member_timeout_ms")]
    pub stop_member_timeout_ms: u64,

    /// Single statement execution, DDL included (unit: milliseconds)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            add_member_timeout_ms: default_add_member_timeout_ms(),
            stop_member_timeout_ms: default_stop_member_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl TimeoutConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("add_member_timeout_ms", self.add_member_timeout_ms),
            ("stop_member_timeout_ms", self.stop_member_timeout_ms),
            ("request_timeout_ms", self.request_timeout_ms),
        ] {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be greater than 0")));
            }
        }
        Ok(())
    }

    pub fn add_member(&self) -> Duration {
        Duration::from_millis(self.add_member_timeout_ms)
    }

    pub fn stop_member(&self) -> Duration {
        Duration::from_millis(self.stop_member_timeout_ms)
    }

    pub fn request(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_add_member_timeout_ms() -> u64 {
    60_000
}
fn default_stop_member_timeout_ms() -> u64 {
    60_000
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
