//! Reference scenario: 3 members in dc1 (one zero-token), 4 keyspaces,
//! 100 rows each, verified before and after the zero-token member stops.

use ringcheck::client::ReplicationStrategy;
use ringcheck::ScenarioState;

use crate::common::enable_logger;
use crate::common::reference_settings;
use crate::common::run_simulated;

#[tokio::test]
async fn reference_scenario_should_pass() {
    enable_logger();

    let (_, report) = run_simulated(reference_settings()).await;

    assert!(report.passed(), "transcript: {:#?}", report.transcript);
    assert_eq!(report.state, ScenarioState::Done);
    assert!(report.failure.is_none());
}

#[tokio::test]
async fn reference_scenario_should_cover_the_full_matrix() {
    enable_logger();

    let (_, report) = run_simulated(reference_settings()).await;

    let cells: Vec<(ReplicationStrategy, bool)> = report.matrix.iter().map(|s| (s.strategy, s.tablets)).collect();
    assert_eq!(
        cells,
        vec![
            (ReplicationStrategy::Everywhere, false),
            (ReplicationStrategy::Simple, false),
            (ReplicationStrategy::NetworkTopology, true),
            (ReplicationStrategy::NetworkTopology, false),
        ]
    );
    assert!(report.matrix.iter().all(|s| s.replication_factor == 2));
    assert!(report.matrix.iter().all(|s| s.name.as_str().starts_with("test_")));
}

#[tokio::test]
async fn transcript_should_record_writes_and_both_passes_per_keyspace() {
    enable_logger();

    let (_, report) = run_simulated(reference_settings()).await;

    for spec in &report.matrix {
        let name = spec.name.as_str();
        assert!(report
            .transcript
            .iter()
            .any(|l| l.starts_with(name) && l.contains("wrote 100 rows (50 even") && l.contains("50 odd")));
        for pass in ["pass 1 OK", "pass 2 OK"] {
            assert!(
                report
                    .transcript
                    .iter()
                    .any(|l| l.starts_with(name) && l.contains(pass) && l.contains("100 rows at CL=ALL")),
                "missing {pass} for {name}"
            );
        }
    }
    assert!(report.transcript.iter().any(|l| l.starts_with("stopped member 2")));
    assert!(report.transcript.last().unwrap().starts_with("PASSED"));
}

#[tokio::test]
async fn scenario_should_pass_with_quorum_writes_and_larger_population() {
    enable_logger();
    let mut settings = reference_settings();
    settings.scenario.population_size = 500;
    settings.scenario.write_consistency = ringcheck::client::Consistency::Quorum;

    let (_, report) = run_simulated(settings).await;

    assert!(report.passed(), "{:?}", report.failure);
}

#[tokio::test]
async fn scenario_should_pass_with_more_ring_members_than_replicas() {
    enable_logger();
    let mut settings = reference_settings();
    settings.topology.members.push(ringcheck::config::MemberConfig {
        rack: "r4".to_string(),
        join_ring: true,
    });

    let (_, report) = run_simulated(settings).await;

    assert!(report.passed(), "{:?}", report.failure);
}

#[tokio::test]
async fn empty_population_should_fail_instead_of_verifying_nothing() {
    enable_logger();
    let mut settings = reference_settings();
    settings.scenario.population_size = 0;

    let (cluster, report) = run_simulated(settings).await;

    assert_eq!(
        report.state,
        ScenarioState::Failed(ringcheck::scenario::Phase::Provisioning)
    );
    assert!(matches!(report.failure, Some(ringcheck::ScenarioError::InvalidSettings(_))));
    assert!(cluster.members().is_empty());
}
