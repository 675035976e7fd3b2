//! Typed statement builders.
//!
//! Names and values travel as typed parameters; CQL text is rendered only for
//! logging via [`Statement::to_cql`].

use std::fmt;

use crate::client::Record;
use crate::constants::MAX_IDENTIFIER_LEN;
use crate::QueryError;

/// A validated, unquoted keyspace or table name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    /// Accepts `[a-z][a-z0-9_]*` up to 48 characters
    pub fn new(name: impl Into<String>) -> std::result::Result<Self, QueryError> {
        let name = name.into();
        let mut chars = name.chars();
        let valid_head = matches!(chars.next(), Some(c) if c.is_ascii_lowercase());
        let valid_tail = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid_head || !valid_tail || name.len() > MAX_IDENTIFIER_LEN {
            return Err(QueryError::InvalidIdentifier(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replica placement policy requested for a keyspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReplicationStrategy {
    /// Every ring member holds a replica; the replication factor is ignored
    Everywhere,
    /// First `rf` distinct ring members clockwise from the token
    Simple,
    /// `rf` replicas per datacenter, spread across racks
    NetworkTopology,
}

impl ReplicationStrategy {
    /// All strategies, in matrix iteration order
    pub const ALL: [ReplicationStrategy; 3] = [
        ReplicationStrategy::Everywhere,
        ReplicationStrategy::Simple,
        ReplicationStrategy::NetworkTopology,
    ];

    pub fn class_name(&self) -> &'static str {
        match self {
            ReplicationStrategy::Everywhere => "EverywhereStrategy",
            ReplicationStrategy::Simple => "SimpleStrategy",
            ReplicationStrategy::NetworkTopology => "NetworkTopologyStrategy",
        }
    }

    /// Tablets can only be enabled for topology-aware keyspaces
    #[inline]
    pub fn supports_tablets(&self) -> bool {
        matches!(self, ReplicationStrategy::NetworkTopology)
    }
}

impl fmt::Display for ReplicationStrategy {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replication {
    pub strategy: ReplicationStrategy,
    pub factor: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateKeyspace {
        name: Identifier,
        replication: Replication,
        tablets: bool,
    },
    /// Creates `(pk int PRIMARY KEY, v int)`
    CreateTable {
        keyspace: Identifier,
        table: Identifier,
    },
    Insert {
        keyspace: Identifier,
        table: Identifier,
        record: Record,
    },
    /// Full scan of every partition of the table
    SelectAll {
        keyspace: Identifier,
        table: Identifier,
    },
}

impl Statement {
    pub fn create_keyspace(
        name: Identifier,
        replication: Replication,
        tablets: bool,
    ) -> Self {
        Statement::CreateKeyspace {
            name,
            replication,
            tablets,
        }
    }

    pub fn create_table(
        keyspace: Identifier,
        table: Identifier,
    ) -> Self {
        Statement::CreateTable { keyspace, table }
    }

    pub fn insert(
        keyspace: Identifier,
        table: Identifier,
        record: Record,
    ) -> Self {
        Statement::Insert {
            keyspace,
            table,
            record,
        }
    }

    pub fn select_all(
        keyspace: Identifier,
        table: Identifier,
    ) -> Self {
        Statement::SelectAll { keyspace, table }
    }

    pub fn to_cql(&self) -> String {
        match self {
            Statement::CreateKeyspace {
                name,
                replication,
                tablets,
            } => format!(
                "CREATE KEYSPACE {name} WITH replication = {{'class': '{}', 'replication_factor': {}}} \
                 AND tablets = {{'enabled': {tablets}}}",
                replication.strategy.class_name(),
                replication.factor,
            ),
            Statement::CreateTable { keyspace, table } => {
                format!("CREATE TABLE {keyspace}.{table} (pk int PRIMARY KEY, v int)")
            }
            Statement::Insert {
                keyspace,
                table,
                record,
            } => format!(
                "INSERT INTO {keyspace}.{table} (pk, v) VALUES ({}, {})",
                record.key, record.value
            ),
            Statement::SelectAll { keyspace, table } => format!("SELECT pk, v FROM {keyspace}.{table}"),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.to_cql())
    }
}
