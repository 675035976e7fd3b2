//! Collision-free names for scenario-owned schema objects.

#[cfg(test)]
use mockall::automock;
use nanoid::nanoid;

use crate::constants::NAME_ALPHABET;
use crate::constants::NAME_SUFFIX_LEN;

#[cfg_attr(test, automock)]
pub trait NameGenerator: Send + Sync {
    /// A name no concurrently running scenario will produce
    fn unique_name(&self) -> String;
}

/// `<prefix>_<12 random [0-9a-z]>` names backed by nanoid
#[derive(Debug, Clone)]
pub struct NanoidNames {
    prefix: String,
}

impl NanoidNames {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl NameGenerator for NanoidNames {
    fn unique_name(&self) -> String {
        format!("{}_{}", self.prefix, nanoid!(NAME_SUFFIX_LEN, &NAME_ALPHABET))
    }
}
