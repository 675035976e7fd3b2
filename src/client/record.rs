use std::cmp::Ordering;
use std::fmt;

/// One `(pk, v)` row of the scenario table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Record {
    pub key: i32,
    pub value: i32,
}

impl Record {
    pub fn new(
        key: i32,
        value: i32,
    ) -> Self {
        Self { key, value }
    }

    /// The row the scenario writes for `key`: value equals key
    pub fn identity(key: i32) -> Self {
        Self { key, value: key }
    }
}

/// Ordered by key; value only breaks ties so ordering agrees with equality
impl Ord for Record {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.key.cmp(&other.key).then(self.value.cmp(&other.value))
    }
}

impl PartialOrd for Record {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Record {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "({}, {})", self.key, self.value)
    }
}

/// Rows returned by a statement; empty for DDL and inserts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    rows: Vec<Record>,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }
}
