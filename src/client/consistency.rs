use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// How many replicas must acknowledge a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Consistency {
    One,
    Quorum,
    /// Every replica of the range must answer
    All,
}

impl Consistency {
    /// Acknowledgements needed out of `replica_count` replicas
    pub fn required_acks(
        &self,
        replica_count: usize,
    ) -> usize {
        match self {
            Consistency::One => replica_count.min(1),
            Consistency::Quorum => replica_count / 2 + 1,
            Consistency::All => replica_count,
        }
    }
}

impl fmt::Display for Consistency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Consistency::One => "ONE",
            Consistency::Quorum => "QUORUM",
            Consistency::All => "ALL",
        };
        f.write_str(name)
    }
}
