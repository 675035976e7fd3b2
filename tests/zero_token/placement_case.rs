//! Placement seen from inside the simulated cluster after a passing run.

use ringcheck::client::Record;

use crate::common::enable_logger;
use crate::common::reference_settings;
use crate::common::run_simulated;
use crate::common::table;

#[tokio::test]
async fn zero_token_member_should_hold_no_replicas_in_any_keyspace() {
    enable_logger();

    let (cluster, report) = run_simulated(reference_settings()).await;
    assert!(report.passed(), "{:?}", report.failure);

    let zero_token: Vec<_> = cluster.members().into_iter().filter(|m| m.is_zero_token()).collect();
    assert_eq!(zero_token.len(), 1);
    for spec in &report.matrix {
        let replicas = cluster.replica_members(&spec.name, &table()).unwrap();
        assert!(!replicas.contains(&zero_token[0].id), "{spec}: {replicas:?}");
        assert!(cluster.local_rows(zero_token[0].id, &spec.name, &table()).is_empty());
    }
}

#[tokio::test]
async fn ring_members_should_each_store_the_complete_set_at_rf_two() {
    enable_logger();

    let (cluster, report) = run_simulated(reference_settings()).await;
    assert!(report.passed(), "{:?}", report.failure);

    let expected: Vec<Record> = (0..100).map(Record::identity).collect();
    for member in cluster.members().into_iter().filter(|m| m.participates_in_ring) {
        for spec in &report.matrix {
            assert_eq!(cluster.local_rows(member.id, &spec.name, &table()), expected, "{member} {spec}");
        }
    }
}

#[tokio::test]
async fn zero_token_member_should_be_down_after_the_run() {
    enable_logger();

    let (cluster, report) = run_simulated(reference_settings()).await;
    assert!(report.passed());

    for member in cluster.members() {
        assert_eq!(cluster.is_alive(member.id), member.participates_in_ring, "{member}");
    }
}
