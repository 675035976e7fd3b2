//! Vnode token ring and per-strategy replica placement.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashSet;
use std::hash::Hash;
use std::hash::Hasher;

use crate::client::Replication;
use crate::client::ReplicationStrategy;
use crate::cluster::MemberId;
use crate::cluster::PlacementAttrs;

pub(crate) type Token = u64;

pub(crate) fn hash_u64<T: Hash>(t: &T) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    let mut s = DefaultHasher::new();
    t.hash(&mut s);
    s.finish()
}

/// Partition token of an `int` partition key
pub(crate) fn token_of(key: i32) -> Token {
    hash_u64(&key)
}

/// Sorted `(token, owner)` continuum of every token-owning member
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenRing {
    entries: Vec<(Token, MemberId)>,
}

impl TokenRing {
    pub(crate) fn build(
        owners: impl IntoIterator<Item = MemberId>,
        num_tokens: u32,
    ) -> Self {
        let mut entries = Vec::new();
        for owner in owners {
            for n in 0..num_tokens {
                entries.push((hash_u64(&(owner, n)), owner));
            }
        }
        entries.sort_unstable();
        Self { entries }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Each token closes one range `(previous token, token]`
    pub(crate) fn range_count(&self) -> usize {
        self.entries.len()
    }

    /// Range owning `token`: the first ring token at or after it, wrapping around
    pub(crate) fn range_of(
        &self,
        token: Token,
    ) -> usize {
        match self.entries.binary_search_by_key(&token, |e| e.0) {
            Ok(i) => i,
            Err(i) if i >= self.entries.len() => 0,
            Err(i) => i,
        }
    }

    /// Owners clockwise starting at `range`, one lap, duplicates included
    pub(crate) fn walk_from(
        &self,
        range: usize,
    ) -> impl Iterator<Item = MemberId> + '_ {
        let (head, tail) = self.entries.split_at(range.min(self.entries.len()));
        tail.iter().chain(head.iter()).map(|e| e.1)
    }

    pub(crate) fn owners(&self) -> BTreeSet<MemberId> {
        self.entries.iter().map(|e| e.1).collect()
    }
}

/// Replicas of one ring range for a vnode-based keyspace.
///
/// `topology` holds the placement of every token-owning member.
pub(crate) fn vnode_replicas(
    ring: &TokenRing,
    range: usize,
    replication: Replication,
    topology: &BTreeMap<MemberId, PlacementAttrs>,
) -> Vec<MemberId> {
    if ring.is_empty() {
        return Vec::new();
    }
    let factor = replication.factor as usize;
    match replication.strategy {
        ReplicationStrategy::Everywhere => ring.owners().into_iter().collect(),
        ReplicationStrategy::Simple => {
            let mut seen = HashSet::new();
            ring.walk_from(range)
                .filter(|m| seen.insert(*m))
                .take(factor)
                .collect()
        }
        ReplicationStrategy::NetworkTopology => {
            let datacenters: BTreeSet<&str> = topology.values().map(|p| p.datacenter.as_str()).collect();
            let mut replicas = Vec::new();
            for dc in datacenters {
                replicas.extend(datacenter_replicas(ring, range, factor, dc, topology));
            }
            replicas
        }
    }
}

/// Walks clockwise taking members on unseen racks first, then fills from the skipped ones
fn datacenter_replicas(
    ring: &TokenRing,
    range: usize,
    factor: usize,
    datacenter: &str,
    topology: &BTreeMap<MemberId, PlacementAttrs>,
) -> Vec<MemberId> {
    let mut seen_members = HashSet::new();
    let mut seen_racks = HashSet::new();
    let mut chosen = Vec::new();
    let mut skipped = Vec::new();

    for member in ring.walk_from(range) {
        if chosen.len() == factor {
            break;
        }
        let Some(placement) = topology.get(&member) else {
            continue;
        };
        if placement.datacenter != datacenter || !seen_members.insert(member) {
            continue;
        }
        if seen_racks.insert(placement.rack.as_str()) {
            chosen.push(member);
        } else {
            skipped.push(member);
        }
    }

    let missing = factor.saturating_sub(chosen.len());
    chosen.extend(skipped.into_iter().take(missing));
    chosen
}
