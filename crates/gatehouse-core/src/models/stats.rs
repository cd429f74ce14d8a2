//! Directory statistics shown above the user table.

use serde::{Deserialize, Serialize};

/// Member count of one group or zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerCount {
    pub key: u64,
    pub name: String,
    pub members: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStats {
    pub total: usize,
    pub active: usize,
    /// Every status other than `Active`, pending included.
    pub inactive: usize,
    pub joined_today: usize,
    pub groups: Vec<ContainerCount>,
    /// Effective members, group-derived access included.
    pub zones: Vec<ContainerCount>,
}
