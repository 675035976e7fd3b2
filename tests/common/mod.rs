use std::sync::Arc;

use ringcheck::client::Identifier;
use ringcheck::config::PlacementFault;
use ringcheck::run_scenario;
use ringcheck::NanoidNames;
use ringcheck::ScenarioReport;
use ringcheck::Settings;
use ringcheck::SimCluster;
use tracing_subscriber::EnvFilter;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for unit test.");
}

/// Reference layout: r1 (ring), r2 (zero-token), r3 (ring), RF=2, 100 rows
pub fn reference_settings() -> Settings {
    Settings::default()
}

pub fn settings_with_fault(fault: PlacementFault) -> Settings {
    let mut settings = reference_settings();
    settings.simulation.fault = fault;
    settings
}

/// Runs the scenario against a fresh simulated cluster, returning the
/// cluster so tests can inspect placement afterwards
pub async fn run_simulated(settings: Settings) -> (SimCluster, ScenarioReport) {
    let cluster = SimCluster::new(settings.simulation.clone());
    let names = NanoidNames::new(settings.scenario.keyspace_prefix.clone());
    let report = run_scenario(
        settings,
        Arc::new(cluster.clone()),
        Arc::new(cluster.clone()),
        Arc::new(names),
    )
    .await;
    (cluster, report)
}

pub fn table() -> Identifier {
    Identifier::new(ringcheck::DEFAULT_TABLE_NAME).unwrap()
}
