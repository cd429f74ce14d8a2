//! User domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::{GroupId, UserId, ZoneId};

/// Account status shown in the directory.
///
/// Variant order is alphabetical so that sorting by status matches the
/// console's "sort by status" column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserStatus {
    Active,
    Inactive,
    Pending,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Inactive => "Inactive",
            UserStatus::Pending => "Pending",
        }
    }

    pub fn is_active(self) -> bool {
        self == UserStatus::Active
    }
}

/// A person holding cards or QR codes for the controlled site.
///
/// Group and zone membership is not stored on the user; it lives in the
/// store's membership relation and is read back through the repositories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    /// Short display initials.
    pub avatar: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub joined: NaiveDate,
}

impl User {
    /// Case-insensitive substring match over name and email.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_contact(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }

    /// Case-insensitive substring match over name, email, company and
    /// position. `needle` must already be lowercase.
    pub fn matches_profile(&self, needle: &str) -> bool {
        self.matches_contact(needle)
            || self
                .company
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(needle))
            || self
                .position
                .as_deref()
                .is_some_and(|p| p.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub avatar: String,
    pub company: Option<String>,
    pub position: Option<String>,
    /// Groups the user joins on creation.
    #[serde(default)]
    pub groups: Vec<GroupId>,
    /// Zones the user is granted directly on creation.
    #[serde(default)]
    pub zones: Vec<ZoneId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<UserStatus>,
    pub avatar: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub company: Option<Option<String>>,
    pub position: Option<Option<String>>,
}
