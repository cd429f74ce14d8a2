//! Access rule domain model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ids::{AccessRuleId, UserId};

/// A named door policy. `description` holds the human-readable time window
/// (`08:00-18:00`, `24/7`, ...) exactly as entered by the operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessRule {
    pub id: AccessRuleId,
    pub name: String,
    pub description: String,
    pub user_ids: BTreeSet<UserId>,
}

impl AccessRule {
    pub fn applies_to(&self, user: UserId) -> bool {
        self.user_ids.contains(&user)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccessRule {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub user_ids: Vec<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAccessRule {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Replaces the whole user list.
    pub user_ids: Option<Vec<UserId>>,
}
