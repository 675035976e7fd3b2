use std::time::Duration;

use super::*;
use crate::client::Consistency;
use crate::client::Identifier;
use crate::client::MockCoordinator;
use crate::client::QueryResult;
use crate::client::Record;
use crate::client::ReplicationStrategy;
use crate::client::Statement;
use crate::test_utils::addr;
use crate::test_utils::enable_logger;
use crate::test_utils::mock_coordinator;
use crate::test_utils::shared;
use crate::QueryError;
use crate::ScenarioError;

fn spec() -> KeyspaceSpec {
    KeyspaceSpec {
        name: Identifier::new("test_ks").unwrap(),
        strategy: ReplicationStrategy::NetworkTopology,
        replication_factor: 2,
        tablets: true,
    }
}

fn table() -> Identifier {
    Identifier::new("tbl").unwrap()
}

/// Answers one full-table read at CL=ALL with `rows`
fn coordinator_returning(rows: Vec<Record>) -> MockCoordinator {
    let mut coordinator = mock_coordinator(addr(2));
    coordinator
        .expect_execute()
        .times(1)
        .withf(|statement, consistency| {
            matches!(statement, Statement::SelectAll { .. }) && *consistency == Consistency::All
        })
        .return_once(move |_, _| Ok(QueryResult::from_rows(rows)));
    coordinator
}

fn verifier(coordinator: MockCoordinator) -> ReadVerifier {
    ReadVerifier::new(shared(coordinator), Duration::from_secs(1))
}

#[test]
fn expected_records_should_pair_each_key_with_itself() {
    let records = expected_records(3);

    assert_eq!(records, vec![Record::new(0, 0), Record::new(1, 1), Record::new(2, 2)]);
    assert_eq!(expected_records(100).len(), 100);
}

#[test]
fn first_difference_should_report_missing_trailing_row() {
    let result = VerificationResult::new(Identifier::new("ks").unwrap(), Pass::First, expected_records(2));

    assert_eq!(
        result.first_difference(&expected_records(3)),
        Some((Some(Record::identity(2)), None))
    );
    assert_eq!(result.first_difference(&expected_records(2)), None);
}

#[tokio::test]
async fn verify_should_accept_complete_set_in_any_order() {
    enable_logger();
    let mut rows = expected_records(100);
    rows.reverse();

    let result = verifier(coordinator_returning(rows))
        .verify(&spec(), &table(), &expected_records(100), Pass::First)
        .await
        .unwrap();

    assert_eq!(result.records(), expected_records(100).as_slice());
    assert_eq!(result.pass, Pass::First);
}

#[tokio::test]
async fn verify_should_report_missing_row() {
    enable_logger();
    let mut rows = expected_records(100);
    rows.remove(42);

    let result = verifier(coordinator_returning(rows))
        .verify(&spec(), &table(), &expected_records(100), Pass::Second)
        .await;

    match result {
        Err(ScenarioError::Mismatch {
            keyspace,
            strategy,
            tablets,
            pass,
            consistency,
            expected_len,
            actual_len,
            expected,
            actual,
        }) => {
            assert_eq!(keyspace, "test_ks");
            assert_eq!(strategy, ReplicationStrategy::NetworkTopology);
            assert!(tablets);
            assert_eq!(pass, Pass::Second);
            assert_eq!(consistency, Consistency::All);
            assert_eq!(expected_len, 100);
            assert_eq!(actual_len, 99);
            assert_eq!(expected, Some(Record::identity(42)));
            assert_eq!(actual, Some(Record::identity(43)));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn verify_should_reject_wrong_value() {
    enable_logger();
    let mut rows = expected_records(10);
    rows[7] = Record::new(7, 70);

    let result = verifier(coordinator_returning(rows))
        .verify(&spec(), &table(), &expected_records(10), Pass::First)
        .await;

    assert!(matches!(
        result,
        Err(ScenarioError::Mismatch {
            expected: Some(Record { key: 7, value: 7 }),
            actual: Some(Record { key: 7, value: 70 }),
            ..
        })
    ));
}

#[tokio::test]
async fn verify_should_reject_extra_and_duplicate_rows() {
    enable_logger();
    let mut rows = expected_records(10);
    rows.push(Record::identity(3));

    let result = verifier(coordinator_returning(rows))
        .verify(&spec(), &table(), &expected_records(10), Pass::First)
        .await;

    assert!(matches!(
        result,
        Err(ScenarioError::Mismatch {
            expected_len: 10,
            actual_len: 11,
            ..
        })
    ));
}

#[tokio::test]
async fn verify_should_surface_read_errors_with_pass() {
    enable_logger();
    let mut coordinator = mock_coordinator(addr(1));
    coordinator.expect_execute().times(1).returning(|_, _| {
        Err(QueryError::Unavailable {
            consistency: Consistency::All,
            required: 2,
            alive: 1,
        })
    });

    let result = verifier(coordinator)
        .verify(&spec(), &table(), &expected_records(10), Pass::Second)
        .await;

    assert!(matches!(
        result,
        Err(ScenarioError::Read {
            pass: Pass::Second,
            tablets: true,
            source: QueryError::Unavailable { .. },
            ..
        })
    ));
}
