use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use tracing::info;

use crate::client::execute_with_timeout;
use crate::client::Consistency;
use crate::client::Coordinator;
use crate::client::Identifier;
use crate::client::Record;
use crate::client::Statement;
use crate::metrics::INSERTS_ISSUED;
use crate::scenario::KeyspaceSpec;
use crate::ScenarioError;

/// Inserts issued for one keyspace, split by coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteSummary {
    pub via_even: usize,
    pub via_odd: usize,
}

impl WriteSummary {
    pub fn total(&self) -> usize {
        self.via_even + self.via_odd
    }
}

/// Writes `(i, i)` for every key, routing even keys through one coordinator
/// and odd keys through the other.
///
/// Inserts are sequential in key order. The first failure aborts the keyspace.
pub struct WriteDistributor {
    even: Arc<dyn Coordinator>,
    odd: Arc<dyn Coordinator>,
    consistency: Consistency,
    timeout: Duration,
}

impl WriteDistributor {
    pub fn new(
        even: Arc<dyn Coordinator>,
        odd: Arc<dyn Coordinator>,
        consistency: Consistency,
        timeout: Duration,
    ) -> Self {
        Self {
            even,
            odd,
            consistency,
            timeout,
        }
    }

    /// Coordinator responsible for `key`
    pub fn coordinator_for(
        &self,
        key: i32,
    ) -> &dyn Coordinator {
        if key % 2 == 0 {
            self.even.as_ref()
        } else {
            self.odd.as_ref()
        }
    }

    pub async fn populate(
        &self,
        spec: &KeyspaceSpec,
        table: &Identifier,
        population: u32,
    ) -> std::result::Result<WriteSummary, ScenarioError> {
        let mut summary = WriteSummary::default();

        for key in 0..population as i32 {
            let coordinator = self.coordinator_for(key);
            let statement = Statement::insert(spec.name.clone(), table.clone(), Record::identity(key));
            execute_with_timeout(coordinator, &statement, self.consistency, self.timeout)
                .await
                .map_err(|source| ScenarioError::Write {
                    keyspace: spec.name.to_string(),
                    key,
                    coordinator: coordinator.address(),
                    source,
                })?;

            let slot = if key % 2 == 0 {
                summary.via_even += 1;
                "even"
            } else {
                summary.via_odd += 1;
                "odd"
            };
            INSERTS_ISSUED.with_label_values(&[slot]).inc();
        }

        debug!(?summary, "populated {}", spec.name);
        info!(
            "wrote {} rows into {} ({} via {}, {} via {})",
            summary.total(),
            spec,
            summary.via_even,
            self.even.address(),
            summary.via_odd,
            self.odd.address()
        );
        Ok(summary)
    }
}
