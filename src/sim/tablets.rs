//! Tablet allocation for tablets-enabled keyspaces.
//!
//! Replicas are assigned per datacenter to the least-loaded eligible members,
//! spreading each tablet across racks first, so tablet counts stay equal
//! across members.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashSet;

use crate::cluster::MemberId;
use crate::cluster::PlacementAttrs;
use crate::sim::ring::Token;

#[derive(Debug, Clone)]
pub(crate) struct TabletMap {
    /// Replica set of each tablet; tablet `i` covers an equal slice of the token space
    replicas: Vec<Vec<MemberId>>,
}

impl TabletMap {
    /// `candidates` are the token-owning members eligible to hold tablets
    pub(crate) fn allocate(
        tablet_count: u32,
        factor: u32,
        candidates: &BTreeMap<MemberId, PlacementAttrs>,
    ) -> Self {
        let datacenters: BTreeSet<&str> = candidates.values().map(|p| p.datacenter.as_str()).collect();
        let mut load: BTreeMap<MemberId, usize> = candidates.keys().map(|id| (*id, 0)).collect();
        let mut replicas = Vec::with_capacity(tablet_count as usize);

        for _ in 0..tablet_count {
            let mut tablet = Vec::new();
            for dc in &datacenters {
                let mut members: Vec<(&MemberId, &PlacementAttrs)> =
                    candidates.iter().filter(|(_, p)| p.datacenter == *dc).collect();
                members.sort_by_key(|(id, _)| (load[*id], **id));

                let mut racks = HashSet::new();
                let mut chosen = Vec::new();
                let mut skipped = Vec::new();
                for (id, placement) in members {
                    if racks.insert(placement.rack.as_str()) {
                        chosen.push(*id);
                    } else {
                        skipped.push(*id);
                    }
                }
                chosen.extend(skipped);
                chosen.truncate(factor as usize);

                for id in &chosen {
                    if let Some(count) = load.get_mut(id) {
                        *count += 1;
                    }
                }
                tablet.extend(chosen);
            }
            replicas.push(tablet);
        }

        Self { replicas }
    }

    pub(crate) fn len(&self) -> usize {
        self.replicas.len()
    }

    pub(crate) fn tablet_of(
        &self,
        token: Token,
    ) -> usize {
        ((token as u128 * self.replicas.len() as u128) >> 64) as usize
    }

    pub(crate) fn replicas(
        &self,
        tablet: usize,
    ) -> &[MemberId] {
        self.replicas.get(tablet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tablet replicas held by each member
    pub(crate) fn load(&self) -> BTreeMap<MemberId, usize> {
        let mut load = BTreeMap::new();
        for tablet in &self.replicas {
            for id in tablet {
                *load.entry(*id).or_insert(0) += 1;
            }
        }
        load
    }
}
