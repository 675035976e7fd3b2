use std::time::Duration;

use super::*;
use crate::client::Consistency;
use crate::client::Identifier;
use crate::client::MockCoordinator;
use crate::client::QueryResult;
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
        strategy: ReplicationStrategy::Simple,
        replication_factor: 2,
        tablets: false,
    }
}

fn table() -> Identifier {
    Identifier::new("tbl").unwrap()
}

/// Accepts exactly `times` inserts whose keys have the given parity
fn expect_inserts(
    coordinator: &mut MockCoordinator,
    parity: i32,
    times: usize,
) {
    coordinator
        .expect_execute()
        .times(times)
        .withf(move |statement, consistency| {
            matches!(statement, Statement::Insert { record, .. } if record.key % 2 == parity && record.value == record.key)
                && *consistency == Consistency::One
        })
        .returning(|_, _| Ok(QueryResult::empty()));
}

fn distributor(
    even: MockCoordinator,
    odd: MockCoordinator,
) -> WriteDistributor {
    WriteDistributor::new(shared(even), shared(odd), Consistency::One, Duration::from_secs(1))
}

#[test]
fn coordinator_for_should_alternate_by_key_parity() {
    let writer = distributor(mock_coordinator(addr(1)), mock_coordinator(addr(2)));

    assert_eq!(writer.coordinator_for(0).address(), addr(1));
    assert_eq!(writer.coordinator_for(1).address(), addr(2));
    assert_eq!(writer.coordinator_for(98).address(), addr(1));
    assert_eq!(writer.coordinator_for(99).address(), addr(2));
}

#[tokio::test]
async fn populate_should_route_even_and_odd_keys_to_their_coordinators() {
    enable_logger();
    let mut even = mock_coordinator(addr(1));
    expect_inserts(&mut even, 0, 50);
    let mut odd = mock_coordinator(addr(2));
    expect_inserts(&mut odd, 1, 50);

    let summary = distributor(even, odd).populate(&spec(), &table(), 100).await.unwrap();

    assert_eq!(summary, WriteSummary { via_even: 50, via_odd: 50 });
    assert_eq!(summary.total(), 100);
}

#[tokio::test]
async fn populate_with_odd_population_should_favour_even_coordinator() {
    enable_logger();
    let mut even = mock_coordinator(addr(1));
    expect_inserts(&mut even, 0, 3);
    let mut odd = mock_coordinator(addr(2));
    expect_inserts(&mut odd, 1, 2);

    let summary = distributor(even, odd).populate(&spec(), &table(), 5).await.unwrap();

    assert_eq!(summary, WriteSummary { via_even: 3, via_odd: 2 });
}

#[tokio::test]
async fn populate_should_fail_on_first_rejected_insert() {
    enable_logger();
    let mut even = mock_coordinator(addr(1));
    expect_inserts(&mut even, 0, 1);
    let mut odd = mock_coordinator(addr(2));
    odd.expect_execute().times(1).returning(|_, _| {
        Err(QueryError::Unavailable {
            consistency: Consistency::One,
            required: 1,
            alive: 0,
        })
    });

    let result = distributor(even, odd).populate(&spec(), &table(), 100).await;

    match result {
        Err(ScenarioError::Write {
            keyspace,
            key,
            coordinator,
            source,
        }) => {
            assert_eq!(keyspace, "test_ks");
            assert_eq!(key, 1);
            assert_eq!(coordinator, addr(2));
            assert!(matches!(source, QueryError::Unavailable { .. }));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
