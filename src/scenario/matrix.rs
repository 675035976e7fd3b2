use std::fmt;
use std::time::Duration;

use tracing::debug;
use tracing::info;

use crate::client::execute_with_timeout;
use crate::client::Consistency;
use crate::client::Coordinator;
use crate::client::Identifier;
use crate::client::Replication;
use crate::client::ReplicationStrategy;
use crate::client::Statement;
use crate::naming::NameGenerator;
use crate::ScenarioError;

/// Tablets flag values, in matrix iteration order
const TABLETS_MODES: [bool; 2] = [true, false];

/// One cell of the keyspace matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyspaceSpec {
    pub name: Identifier,
    pub strategy: ReplicationStrategy,
    pub replication_factor: u32,
    pub tablets: bool,
}

impl KeyspaceSpec {
    pub fn replication(&self) -> Replication {
        Replication {
            strategy: self.strategy,
            factor: self.replication_factor,
        }
    }
}

impl fmt::Display for KeyspaceSpec {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} ({}, rf={}, tablets={})",
            self.name, self.strategy, self.replication_factor, self.tablets
        )
    }
}

/// Tablets may only be enabled for the topology-aware strategy
#[inline]
pub fn is_valid(
    strategy: ReplicationStrategy,
    tablets: bool,
) -> bool {
    !tablets || strategy.supports_tablets()
}

/// Valid `(strategy, tablets)` pairs, strategy-major
pub fn combinations() -> Vec<(ReplicationStrategy, bool)> {
    ReplicationStrategy::ALL
        .iter()
        .flat_map(|strategy| TABLETS_MODES.iter().map(move |tablets| (*strategy, *tablets)))
        .filter(|(strategy, tablets)| is_valid(*strategy, *tablets))
        .collect()
}

/// Names every valid combination with a fresh keyspace name
pub fn generate(
    names: &dyn NameGenerator,
    replication_factor: u32,
) -> std::result::Result<Vec<KeyspaceSpec>, ScenarioError> {
    combinations()
        .into_iter()
        .map(|(strategy, tablets)| {
            let name = names.unique_name();
            let name = Identifier::new(name.as_str()).map_err(|source| ScenarioError::Ddl {
                keyspace: name,
                source,
            })?;
            Ok(KeyspaceSpec {
                name,
                strategy,
                replication_factor,
                tablets,
            })
        })
        .collect()
}

/// Creates every keyspace of `specs` and its table through `coordinator`
pub async fn provision(
    coordinator: &dyn Coordinator,
    specs: &[KeyspaceSpec],
    table: &Identifier,
    timeout: Duration,
) -> std::result::Result<(), ScenarioError> {
    for spec in specs {
        let statements = [
            Statement::create_keyspace(spec.name.clone(), spec.replication(), spec.tablets),
            Statement::create_table(spec.name.clone(), table.clone()),
        ];
        for statement in &statements {
            debug!("[{}] {}", coordinator.address(), statement);
            execute_with_timeout(coordinator, statement, Consistency::All, timeout)
                .await
                .map_err(|source| ScenarioError::Ddl {
                    keyspace: spec.name.to_string(),
                    source,
                })?;
        }
        info!("created keyspace {}", spec);
    }
    Ok(())
}
