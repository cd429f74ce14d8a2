//! Zone domain model.

use serde::{Deserialize, Serialize};

use super::ids::{GroupId, UserId, ZoneId};

/// A physical area guarded by readers.
///
/// Users reach a zone directly or through a group assigned to it. A locked
/// zone rejects membership and group-assignment changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Zone {
    pub id: ZoneId,
    /// Unique within the directory.
    pub name: String,
    pub description: String,
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateZone {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub assigned_groups: Vec<GroupId>,
    #[serde(default)]
    pub assigned_users: Vec<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateZone {
    pub name: Option<String>,
    pub description: Option<String>,
}
