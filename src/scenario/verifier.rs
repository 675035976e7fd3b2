use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use tracing::debug;
use tracing::error;
use tracing::info;

use crate::client::execute_with_timeout;
use crate::client::Consistency;
use crate::client::Coordinator;
use crate::client::Identifier;
use crate::client::Record;
use crate::client::Statement;
use crate::metrics::KEYSPACES_VERIFIED;
use crate::metrics::VERIFY_LATENCY_MS;
use crate::scenario::KeyspaceSpec;
use crate::scenario::Pass;
use crate::ScenarioError;

/// Reads must be answered by every replica
pub const VERIFY_CONSISTENCY: Consistency = Consistency::All;

/// `{(i, i) : 0 <= i < population}` in key order
pub fn expected_records(population: u32) -> Vec<Record> {
    (0..population as i32).map(Record::identity).collect()
}

/// Records read from one keyspace in one pass, sorted by key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub keyspace: Identifier,
    pub pass: Pass,
    records: Vec<Record>,
}

impl VerificationResult {
    pub fn new(
        keyspace: Identifier,
        pass: Pass,
        mut records: Vec<Record>,
    ) -> Self {
        records.sort();
        Self {
            keyspace,
            pass,
            records,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// First position where the result and `expected` disagree, as
    /// `(expected, actual)`; `None` when they are equal
    pub fn first_difference(
        &self,
        expected: &[Record],
    ) -> Option<(Option<Record>, Option<Record>)> {
        let len = self.records.len().max(expected.len());
        (0..len)
            .map(|i| (expected.get(i).copied(), self.records.get(i).copied()))
            .find(|(e, a)| e != a)
    }
}

/// Issues full-consistency reads through a single coordinator
pub struct ReadVerifier {
    coordinator: Arc<dyn Coordinator>,
    timeout: Duration,
}

impl ReadVerifier {
    pub fn new(
        coordinator: Arc<dyn Coordinator>,
        timeout: Duration,
    ) -> Self {
        Self { coordinator, timeout }
    }

    pub fn coordinator(&self) -> &dyn Coordinator {
        self.coordinator.as_ref()
    }

    /// Reads every row of `spec` at [`VERIFY_CONSISTENCY`] and requires an
    /// exact match with `expected`
    pub async fn verify(
        &self,
        spec: &KeyspaceSpec,
        table: &Identifier,
        expected: &[Record],
        pass: Pass,
    ) -> std::result::Result<VerificationResult, ScenarioError> {
        let statement = Statement::select_all(spec.name.clone(), table.clone());
        let pass_label = pass.to_string();
        let started = Instant::now();
        let rows = execute_with_timeout(
            self.coordinator.as_ref(),
            &statement,
            VERIFY_CONSISTENCY,
            self.timeout,
        )
        .await
        .map_err(|source| ScenarioError::Read {
            keyspace: spec.name.to_string(),
            strategy: spec.strategy,
            tablets: spec.tablets,
            pass,
            source,
        })?
        .into_rows();
        VERIFY_LATENCY_MS
            .with_label_values(&[pass_label.as_str()])
            .observe(started.elapsed().as_secs_f64() * 1000.0);

        let result = VerificationResult::new(spec.name.clone(), pass, rows);
        if let Some((expected_record, actual_record)) = result.first_difference(expected) {
            error!(
                "pass {} mismatch in {}: expected {} rows, got {}",
                pass,
                spec,
                expected.len(),
                result.records().len()
            );
            return Err(ScenarioError::Mismatch {
                keyspace: spec.name.to_string(),
                strategy: spec.strategy,
                tablets: spec.tablets,
                pass,
                consistency: VERIFY_CONSISTENCY,
                expected_len: expected.len(),
                actual_len: result.records().len(),
                expected: expected_record,
                actual: actual_record,
            });
        }

        debug!("pass {} read {} rows in {:?}", pass, result.records().len(), started.elapsed());
        info!(
            "pass {} verified {} via {} at CL={}",
            pass,
            spec,
            self.coordinator.address(),
            VERIFY_CONSISTENCY
        );
        KEYSPACES_VERIFIED.with_label_values(&[pass_label.as_str()]).inc();
        Ok(result)
    }
}
