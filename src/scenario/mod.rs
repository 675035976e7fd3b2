//! Zero-token replication verification scenario.
//!
//! Components, in the order the [`Scenario`] drives them:
//! - [`generate`] - Keyspace matrix of strategy x tablets, created by [`provision`]
//! - [`WriteDistributor`] - Populates each keyspace alternating coordinators by key parity
//! - [`ReadVerifier`] - Full-consistency read compared against the complete record set
//! - [`LifecycleDriver`] - Gracefully stops the zero-token member between passes

mod lifecycle;
mod matrix;
mod orchestrator;
mod verifier;
mod writer;

pub use lifecycle::*;
pub use matrix::*;
pub use orchestrator::*;
pub use verifier::*;
pub use writer::*;

#[cfg(test)]
mod verifier_test;
#[cfg(test)]
mod writer_test;

use std::fmt;

/// Verification pass, relative to the lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Before the zero-token member is stopped
    First,
    /// After the zero-token member is stopped
    Second,
}

impl fmt::Display for Pass {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Pass::First => f.write_str("1"),
            Pass::Second => f.write_str("2"),
        }
    }
}
