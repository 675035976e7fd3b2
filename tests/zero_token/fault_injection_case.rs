//! A cluster that wrongly gives zero-token members tokens must be caught.

use ringcheck::client::Consistency;
use ringcheck::config::PlacementFault;
use ringcheck::scenario::Pass;
use ringcheck::scenario::Phase;
use ringcheck::QueryError;
use ringcheck::ScenarioError;
use ringcheck::ScenarioState;

use crate::common::enable_logger;
use crate::common::run_simulated;
use crate::common::settings_with_fault;
use crate::common::table;

#[tokio::test]
async fn zero_token_replicas_should_fail_the_second_pass() {
    enable_logger();

    let (_, report) = run_simulated(settings_with_fault(PlacementFault::ZeroTokenReplicas)).await;

    assert_eq!(report.state, ScenarioState::Failed(Phase::VerifyingPass2));
    assert!(report.transcript.iter().any(|l| l.contains("pass 1 OK")));
    match report.failure {
        Some(ScenarioError::Read {
            pass: Pass::Second,
            source:
                QueryError::Unavailable {
                    consistency: Consistency::All,
                    ..
                },
            ..
        }) => {}
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[tokio::test]
async fn zero_token_replicas_should_be_visible_in_placement() {
    enable_logger();

    let (cluster, report) = run_simulated(settings_with_fault(PlacementFault::ZeroTokenReplicas)).await;

    let zero_token = cluster
        .members()
        .into_iter()
        .find(|m| m.is_zero_token())
        .unwrap();
    let everywhere = &report.matrix[0];
    let replicas = cluster.replica_members(&everywhere.name, &table()).unwrap();
    assert!(replicas.contains(&zero_token.id));
}

#[tokio::test]
async fn failed_report_should_convert_into_an_error_naming_pass_two() {
    enable_logger();

    let (_, report) = run_simulated(settings_with_fault(PlacementFault::ZeroTokenReplicas)).await;
    let err = report.into_result().unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Pass 2 read of test_"), "{message}");
    assert!(message.contains("EverywhereStrategy"), "{message}");
}
