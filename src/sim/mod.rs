//! In-process cluster implementing both collaborator interfaces.
//!
//! The simulation keeps just enough of a storage engine to observe replica
//! placement from the outside: a vnode token ring, tablet maps, per-member
//! row storage, and consistency-level availability checks. It is what the
//! binary and the integration tests run the scenario against.
//!
//! Members joining after rows were written do not stream data to themselves.

mod ring;
mod session;
mod tablets;

pub use session::*;

#[cfg(test)]
mod tablets_test;

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::net::IpAddr;
use std::net::Ipv4Addr;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::client::Connector;
use crate::client::Consistency;
use crate::client::Coordinator;
use crate::client::Identifier;
use crate::client::QueryResult;
use crate::client::Record;
use crate::client::Replication;
use crate::client::RoutingPolicy;
use crate::client::Statement;
use crate::cluster::ClusterControl;
use crate::cluster::ClusterMember;
use crate::cluster::MemberId;
use crate::cluster::PlacementAttrs;
use crate::config::PlacementFault;
use crate::config::SimulationConfig;
use crate::ProvisioningError;
use crate::QueryError;
use self::ring::token_of;
use self::ring::vnode_replicas;
use self::ring::Token;
use self::ring::TokenRing;
use self::tablets::TabletMap;

type TableKey = (Identifier, Identifier);

#[derive(Debug)]
struct MemberState {
    member: ClusterMember,
    alive: bool,
    /// Whether the member was handed tokens, which differs from
    /// `participates_in_ring` only under [`PlacementFault::ZeroTokenReplicas`]
    owns_tokens: bool,
    rows: HashMap<TableKey, BTreeMap<i32, i32>>,
}

#[derive(Debug)]
struct KeyspaceDef {
    replication: Replication,
    tablets: bool,
    tables: HashMap<Identifier, TableDef>,
}

#[derive(Debug)]
struct TableDef {
    /// Present only in tablets-enabled keyspaces
    tablets: Option<TabletMap>,
}

#[derive(Debug, Default)]
struct ClusterState {
    members: BTreeMap<MemberId, MemberState>,
    ring: TokenRing,
    keyspaces: HashMap<Identifier, KeyspaceDef>,
}

impl ClusterState {
    /// Placement of every token-owning member
    fn token_owners(&self) -> BTreeMap<MemberId, PlacementAttrs> {
        self.members
            .iter()
            .filter(|(_, s)| s.owns_tokens)
            .map(|(id, s)| (*id, s.member.placement.clone()))
            .collect()
    }

    fn is_alive(
        &self,
        id: MemberId,
    ) -> bool {
        self.members.get(&id).map(|s| s.alive).unwrap_or(false)
    }

    fn table(
        &self,
        keyspace: &Identifier,
        table: &Identifier,
    ) -> std::result::Result<(&KeyspaceDef, &TableDef), QueryError> {
        let ks = self
            .keyspaces
            .get(keyspace)
            .ok_or_else(|| QueryError::UnknownKeyspace(keyspace.to_string()))?;
        let tbl = ks.tables.get(table).ok_or_else(|| QueryError::UnknownTable {
            keyspace: keyspace.to_string(),
            table: table.to_string(),
        })?;
        Ok((ks, tbl))
    }

    fn range_count(
        &self,
        table: &TableDef,
    ) -> usize {
        match &table.tablets {
            Some(tablets) => tablets.len(),
            None => self.ring.range_count(),
        }
    }

    fn range_of(
        &self,
        table: &TableDef,
        token: Token,
    ) -> usize {
        match &table.tablets {
            Some(tablets) => tablets.tablet_of(token),
            None => self.ring.range_of(token),
        }
    }

    fn replicas(
        &self,
        keyspace: &KeyspaceDef,
        table: &TableDef,
        range: usize,
    ) -> Vec<MemberId> {
        match &table.tablets {
            Some(tablets) => tablets.replicas(range).to_vec(),
            None => vnode_replicas(&self.ring, range, keyspace.replication, &self.token_owners()),
        }
    }

    /// Live replicas of `range` plus how many of them must answer, or
    /// `Unavailable` when too few are up
    fn live_replicas(
        &self,
        keyspace: &KeyspaceDef,
        table: &TableDef,
        range: usize,
        consistency: Consistency,
    ) -> std::result::Result<(Vec<MemberId>, usize), QueryError> {
        let replicas = self.replicas(keyspace, table, range);
        let required = consistency.required_acks(replicas.len()).max(1);
        let alive: Vec<MemberId> = replicas.into_iter().filter(|id| self.is_alive(*id)).collect();
        if alive.len() < required {
            return Err(QueryError::Unavailable {
                consistency,
                required,
                alive: alive.len(),
            });
        }
        Ok((alive, required))
    }

    fn create_keyspace(
        &mut self,
        name: &Identifier,
        replication: Replication,
        tablets: bool,
    ) -> std::result::Result<(), QueryError> {
        if tablets && !replication.strategy.supports_tablets() {
            return Err(QueryError::InvalidStatement(format!(
                "tablets are not supported with {}",
                replication.strategy
            )));
        }
        if self.keyspaces.contains_key(name) {
            return Err(QueryError::KeyspaceExists(name.to_string()));
        }
        self.keyspaces.insert(
            name.clone(),
            KeyspaceDef {
                replication,
                tablets,
                tables: HashMap::new(),
            },
        );
        Ok(())
    }

    fn create_table(
        &mut self,
        keyspace: &Identifier,
        table: &Identifier,
        initial_tablets: u32,
    ) -> std::result::Result<(), QueryError> {
        let owners = self.token_owners();
        let ks = self
            .keyspaces
            .get_mut(keyspace)
            .ok_or_else(|| QueryError::UnknownKeyspace(keyspace.to_string()))?;
        if ks.tables.contains_key(table) {
            return Err(QueryError::InvalidStatement(format!(
                "table {keyspace}.{table} already exists"
            )));
        }
        let tablets = ks
            .tablets
            .then(|| TabletMap::allocate(initial_tablets, ks.replication.factor, &owners));
        if let Some(map) = &tablets {
            debug!("allocated {} tablets for {keyspace}.{table}: {:?}", map.len(), map.load());
        }
        ks.tables.insert(table.clone(), TableDef { tablets });
        Ok(())
    }

    fn insert(
        &mut self,
        keyspace: &Identifier,
        table: &Identifier,
        record: Record,
        consistency: Consistency,
    ) -> std::result::Result<(), QueryError> {
        let (ks, tbl) = self.table(keyspace, table)?;
        let range = self.range_of(tbl, token_of(record.key));
        // Writes reach every live replica regardless of the consistency level.
        let (targets, _) = self.live_replicas(ks, tbl, range, consistency)?;

        let key = (keyspace.clone(), table.clone());
        for id in targets {
            if let Some(state) = self.members.get_mut(&id) {
                state.rows.entry(key.clone()).or_default().insert(record.key, record.value);
            }
        }
        Ok(())
    }

    /// Full scan: every range must reach the consistency level, rows come
    /// back in token order
    fn select_all(
        &self,
        keyspace: &Identifier,
        table: &Identifier,
        consistency: Consistency,
    ) -> std::result::Result<Vec<Record>, QueryError> {
        let (ks, tbl) = self.table(keyspace, table)?;

        let mut contacted: Vec<Vec<MemberId>> = Vec::with_capacity(self.range_count(tbl));
        for range in 0..self.range_count(tbl) {
            let (mut alive, required) = self.live_replicas(ks, tbl, range, consistency)?;
            alive.truncate(required);
            contacted.push(alive);
        }

        let key = (keyspace.clone(), table.clone());
        let mut merged: BTreeMap<(Token, i32), i32> = BTreeMap::new();
        let members: BTreeSet<MemberId> = contacted.iter().flatten().copied().collect();
        for id in members {
            let Some(rows) = self.members.get(&id).and_then(|s| s.rows.get(&key)) else {
                continue;
            };
            for (k, v) in rows {
                let token = token_of(*k);
                if contacted[self.range_of(tbl, token)].contains(&id) {
                    merged.insert((token, *k), *v);
                }
            }
        }
        Ok(merged
            .into_iter()
            .map(|((_, key), value)| Record::new(key, value))
            .collect())
    }
}

/// Shared handle to the simulated cluster; clones observe the same state
#[derive(Clone)]
pub struct SimCluster {
    config: SimulationConfig,
    state: Arc<RwLock<ClusterState>>,
}

impl SimCluster {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ClusterState::default())),
        }
    }

    pub fn members(&self) -> Vec<ClusterMember> {
        self.state.read().members.values().map(|s| s.member.clone()).collect()
    }

    pub fn is_alive(
        &self,
        id: MemberId,
    ) -> bool {
        self.state.read().is_alive(id)
    }

    /// Every member holding a replica of any range of `keyspace.table`
    pub fn replica_members(
        &self,
        keyspace: &Identifier,
        table: &Identifier,
    ) -> std::result::Result<BTreeSet<MemberId>, QueryError> {
        let state = self.state.read();
        let (ks, tbl) = state.table(keyspace, table)?;
        Ok((0..state.range_count(tbl))
            .flat_map(|range| state.replicas(ks, tbl, range))
            .collect())
    }

    /// Rows `member` stores locally for `keyspace.table`
    pub fn local_rows(
        &self,
        member: MemberId,
        keyspace: &Identifier,
        table: &Identifier,
    ) -> Vec<Record> {
        let key = (keyspace.clone(), table.clone());
        self.state
            .read()
            .members
            .get(&member)
            .and_then(|s| s.rows.get(&key))
            .map(|rows| rows.iter().map(|(k, v)| Record::new(*k, *v)).collect())
            .unwrap_or_default()
    }

    fn member_by_address(
        &self,
        address: SocketAddr,
    ) -> Option<(MemberId, bool)> {
        self.state
            .read()
            .members
            .values()
            .find(|s| s.member.address == address)
            .map(|s| (s.member.id, s.alive))
    }

    /// Live members, in id order, that `policy` allows to coordinate
    pub(crate) fn eligible_coordinators(
        &self,
        policy: &RoutingPolicy,
    ) -> Vec<MemberId> {
        let state = self.state.read();
        state
            .members
            .values()
            .filter(|s| s.alive)
            .filter(|s| match policy {
                RoutingPolicy::WhiteList(hosts) => hosts.contains(&s.member.address),
                RoutingPolicy::RoundRobin => true,
            })
            .map(|s| s.member.id)
            .collect()
    }

    /// Executes `statement` with `coordinator` routing it to the replicas
    pub(crate) fn apply(
        &self,
        coordinator: MemberId,
        statement: &Statement,
        consistency: Consistency,
    ) -> std::result::Result<QueryResult, QueryError> {
        let mut state = self.state.write();
        let address = state
            .members
            .get(&coordinator)
            .filter(|s| s.alive)
            .map(|s| s.member.address)
            .ok_or_else(|| QueryError::NoHostAvailable(Vec::new()))?;
        debug!("[{}] executing `{}` at {}", address, statement, consistency);

        match statement {
            Statement::CreateKeyspace {
                name,
                replication,
                tablets,
            } => {
                state.create_keyspace(name, *replication, *tablets)?;
                Ok(QueryResult::empty())
            }
            Statement::CreateTable { keyspace, table } => {
                state.create_table(keyspace, table, self.config.initial_tablets)?;
                Ok(QueryResult::empty())
            }
            Statement::Insert {
                keyspace,
                table,
                record,
            } => {
                state.insert(keyspace, table, *record, consistency)?;
                Ok(QueryResult::empty())
            }
            Statement::SelectAll { keyspace, table } => {
                let rows = state.select_all(keyspace, table, consistency)?;
                Ok(QueryResult::from_rows(rows))
            }
        }
    }
}

#[async_trait]
impl ClusterControl for SimCluster {
    async fn add_member(
        &self,
        placement: PlacementAttrs,
        participates_in_ring: bool,
    ) -> std::result::Result<ClusterMember, ProvisioningError> {
        let mut state = self.state.write();
        let id = state.members.keys().next_back().map(|id| id + 1).unwrap_or(1);
        let Ok(last_octet) = u8::try_from(id) else {
            return Err(ProvisioningError::JoinFailed {
                datacenter: placement.datacenter,
                rack: placement.rack,
                reason: format!("loopback addresses exhausted at member {id}"),
            });
        };
        let address = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, last_octet)), self.config.cql_port);

        let owns_tokens = participates_in_ring || self.config.fault == PlacementFault::ZeroTokenReplicas;
        if owns_tokens && !participates_in_ring {
            warn!("member {} is zero-token but will own tokens (injected fault)", id);
        }
        let member = ClusterMember {
            id,
            address,
            participates_in_ring,
            placement,
        };
        state.members.insert(
            id,
            MemberState {
                member: member.clone(),
                alive: true,
                owns_tokens,
                rows: HashMap::new(),
            },
        );

        let owners: Vec<MemberId> = state.token_owners().into_keys().collect();
        state.ring = TokenRing::build(owners, self.config.num_tokens);
        info!("{} joined; ring has {} tokens", member, state.ring.range_count());
        Ok(member)
    }

    async fn stop_member_gracefully(
        &self,
        member_id: MemberId,
    ) -> std::result::Result<(), ProvisioningError> {
        let mut state = self.state.write();
        let member = state
            .members
            .get_mut(&member_id)
            .ok_or(ProvisioningError::UnknownMember(member_id))?;
        if !member.alive {
            return Err(ProvisioningError::AlreadyStopped(member_id));
        }
        // Token ownership survives a stop; only liveness changes.
        member.alive = false;
        info!("{} stopped", member.member);
        Ok(())
    }
}

#[async_trait]
impl Connector for SimCluster {
    async fn connect(
        &self,
        address: SocketAddr,
        policy: RoutingPolicy,
    ) -> std::result::Result<Arc<dyn Coordinator>, QueryError> {
        match self.member_by_address(address) {
            Some((_, true)) => Ok(Arc::new(SimSession::new(self.clone(), address, policy))),
            _ => Err(QueryError::ConnectionRefused(address)),
        }
    }
}
