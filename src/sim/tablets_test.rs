use std::collections::BTreeMap;

use super::*;
use crate::cluster::PlacementAttrs;

fn candidates(members: &[(MemberId, &str)]) -> BTreeMap<MemberId, PlacementAttrs> {
    members
        .iter()
        .map(|(id, rack)| (*id, PlacementAttrs::new("dc1", *rack)))
        .collect()
}

#[test]
fn allocate_should_create_requested_number_of_tablets() {
    let map = TabletMap::allocate(8, 2, &candidates(&[(1, "r1"), (3, "r3")]));

    assert_eq!(map.len(), 8);
    for tablet in 0..map.len() {
        assert_eq!(map.replicas(tablet).len(), 2);
    }
}

#[test]
fn allocate_should_only_use_candidates() {
    let map = TabletMap::allocate(8, 2, &candidates(&[(1, "r1"), (3, "r3")]));

    for tablet in 0..map.len() {
        assert!(map.replicas(tablet).iter().all(|id| *id == 1 || *id == 3));
    }
}

#[test]
fn allocate_should_balance_load_across_members() {
    let map = TabletMap::allocate(9, 1, &candidates(&[(1, "r1"), (2, "r2"), (3, "r3")]));

    let load = map.load();
    assert_eq!(load.get(&1), Some(&3));
    assert_eq!(load.get(&2), Some(&3));
    assert_eq!(load.get(&3), Some(&3));
}

#[test]
fn allocate_should_spread_replicas_across_racks() {
    let map = TabletMap::allocate(6, 2, &candidates(&[(1, "a"), (2, "a"), (3, "b")]));

    for tablet in 0..map.len() {
        assert!(map.replicas(tablet).contains(&3));
    }
}

#[test]
fn allocate_without_candidates_should_leave_tablets_unreplicated() {
    let map = TabletMap::allocate(4, 2, &BTreeMap::new());

    assert_eq!(map.len(), 4);
    assert!(map.replicas(0).is_empty());
}

#[test]
fn tablet_of_should_split_token_space_evenly() {
    let map = TabletMap::allocate(4, 1, &candidates(&[(1, "r1")]));

    assert_eq!(map.tablet_of(0), 0);
    assert_eq!(map.tablet_of(u64::MAX / 4 + 1), 1);
    assert_eq!(map.tablet_of(u64::MAX / 2 + 1), 2);
    assert_eq!(map.tablet_of(u64::MAX), 3);
}

#[test]
fn replicas_of_missing_tablet_should_be_empty() {
    let map = TabletMap::allocate(0, 2, &candidates(&[(1, "r1"), (3, "r3")]));

    assert_eq!(map.len(), 0);
    assert_eq!(map.tablet_of(12_345), 0);
    assert!(map.replicas(0).is_empty());
}
