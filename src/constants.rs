// -
// Scenario reference parameters

/// Rows written to every keyspace of the matrix
pub const DEFAULT_POPULATION_SIZE: u32 = 100;

pub const DEFAULT_REPLICATION_FACTOR: u32 = 2;

pub const DEFAULT_DATACENTER: &str = "dc1";

pub const DEFAULT_KEYSPACE_PREFIX: &str = "test";

pub const DEFAULT_TABLE_NAME: &str = "tbl";

// -
// Collaborator defaults

pub const DEFAULT_CQL_PORT: u16 = 9042;

pub(crate) const ENV_PREFIX: &str = "RINGCHECK";
pub(crate) const ENV_CONFIG_PATH: &str = "RINGCHECK_CONFIG";

/// Longest identifier the storage engine accepts for keyspaces and tables
pub(crate) const MAX_IDENTIFIER_LEN: usize = 48;

/// Alphabet used for generated keyspace suffixes; lowercase keeps them valid unquoted identifiers
pub(crate) const NAME_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l',
    'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
pub(crate) const NAME_SUFFIX_LEN: usize = 12;
