//! Directory document: the fixture format the store is seeded from and
//! exported to.
//!
//! The layout follows the console's mock data. Users reference groups and
//! zones by *name*, zones reference groups and users by *key*. Loading
//! resolves both into the key-based membership relation.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use gatehouse_core::models::group::{DateRange, GroupType};
use gatehouse_core::models::shift::clock_time;
use gatehouse_core::models::user::UserStatus;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreError;

/// Built-in seed data.
pub const SEED_JSON: &str = include_str!("../fixtures/seed.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryDocument {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    #[serde(default)]
    pub zones: Vec<ZoneRecord>,
    #[serde(default)]
    pub access_rules: Vec<AccessRuleRecord>,
    #[serde(default)]
    pub shifts: Vec<ShiftRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub key: u64,
    pub name: String,
    pub email: String,
    /// Group names.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Zone names.
    #[serde(default)]
    pub zones: Vec<String>,
    pub status: UserStatus,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    pub joined: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub key: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRecord {
    pub key: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Group keys.
    #[serde(default)]
    pub assigned_groups: Vec<u64>,
    /// User keys.
    #[serde(default)]
    pub assigned_users: Vec<u64>,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRuleRecord {
    pub key: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_keys: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRecord {
    pub key: u64,
    pub name: String,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    #[serde(default)]
    pub user_keys: Vec<u64>,
}

impl DirectoryDocument {
    pub fn parse(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn builtin_seed() -> Result<Self, StoreError> {
        Self::parse(SEED_JSON)
    }

    pub fn read(path: &Path) -> Result<Self, StoreError> {
        info!(path = %path.display(), "Reading directory fixture");
        let json = std::fs::read_to_string(path)?;
        Self::parse(&json)
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Largest key used by any collection.
    pub fn max_key(&self) -> u64 {
        let users = self.users.iter().map(|r| r.key);
        let groups = self.groups.iter().map(|r| r.key);
        let zones = self.zones.iter().map(|r| r.key);
        let rules = self.access_rules.iter().map(|r| r.key);
        let shifts = self.shifts.iter().map(|r| r.key);
        users
            .chain(groups)
            .chain(zones)
            .chain(rules)
            .chain(shifts)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_seed_parses() {
        let doc = DirectoryDocument::builtin_seed().unwrap();
        assert_eq!(doc.users.len(), 7);
        assert_eq!(doc.groups.len(), 4);
        assert_eq!(doc.zones.len(), 3);
        assert_eq!(doc.access_rules.len(), 4);
        assert_eq!(doc.shifts.len(), 3);

        let visitor = doc.groups.iter().find(|g| g.name == "Visitor").unwrap();
        assert_eq!(visitor.group_type, GroupType::Visitor);
        assert!(visitor.date_range.is_some());

        let control = doc.groups.iter().find(|g| g.key == 1).unwrap();
        assert!(control.locked);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let doc = DirectoryDocument::parse(r#"{"users": []}"#).unwrap();
        assert!(doc.groups.is_empty());
        assert_eq!(doc.max_key(), 0);
    }

    #[test]
    fn malformed_shift_time_is_rejected() {
        let json = r#"{"shifts": [{"key": 1, "name": "Bad", "startTime": "8am", "endTime": "16:00"}]}"#;
        assert!(matches!(
            DirectoryDocument::parse(json),
            Err(StoreError::Json(_))
        ));
    }

    #[test]
    fn exported_json_keeps_wire_names() {
        let doc = DirectoryDocument::builtin_seed().unwrap();
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"accessRules\""));
        assert!(json.contains("\"Full Time\""));
        assert!(json.contains("\"16:00\""));
        assert_eq!(DirectoryDocument::parse(&json).unwrap().max_key(), 7);
    }
}
