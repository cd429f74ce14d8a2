//! Membership relation and mutation outcomes.
//!
//! A membership is a `(user, container)` tuple where the container is
//! either a group or a zone. Zones additionally hold whole groups; a user
//! reaches a zone through such an assignment without a tuple of their own.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{GroupId, UserId, ZoneId};

/// Anything a user can be a member of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Container {
    Group(GroupId),
    Zone(ZoneId),
}

impl Container {
    pub fn kind(self) -> ContainerKind {
        match self {
            Container::Group(_) => ContainerKind::Group,
            Container::Zone(_) => ContainerKind::Zone,
        }
    }

    pub fn key(self) -> u64 {
        match self {
            Container::Group(id) => id.get(),
            Container::Zone(id) => id.get(),
        }
    }
}

impl From<GroupId> for Container {
    fn from(id: GroupId) -> Self {
        Container::Group(id)
    }
}

impl From<ZoneId> for Container {
    fn from(id: ZoneId) -> Self {
        Container::Zone(id)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind().as_str(), self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Group,
    Zone,
}

impl ContainerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerKind::Group => "group",
            ContainerKind::Zone => "zone",
        }
    }
}

/// One row of the membership relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Membership {
    pub user: UserId,
    pub container: Container,
}

/// Outcome of a single membership mutation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Change {
    Applied,
    /// Nothing to do: already a member, not a member, or source equals
    /// destination.
    Unchanged,
}

impl Change {
    pub fn is_applied(self) -> bool {
        self == Change::Applied
    }
}

/// Outcome of a bulk add. Keys are reported once each, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchChange<K> {
    pub applied: Vec<K>,
    pub unchanged: Vec<K>,
}

impl<K> Default for BatchChange<K> {
    fn default() -> Self {
        Self {
            applied: Vec::new(),
            unchanged: Vec::new(),
        }
    }
}

impl<K> BatchChange<K> {
    pub fn is_unchanged(&self) -> bool {
        self.applied.is_empty()
    }
}

/// A finished drag gesture from the membership board.
///
/// `destination` is `None` when the card was dropped outside every
/// container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd {
    pub user: UserId,
    pub source: Container,
    pub destination: Option<Container>,
}
