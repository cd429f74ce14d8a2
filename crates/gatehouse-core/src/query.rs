//! Search, sort and pagination parameters for directory reads.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

impl Pagination {
    /// Slice `items` to the requested page.
    pub fn apply<T>(self, items: Vec<T>) -> PaginatedResult<T> {
        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect();
        PaginatedResult {
            items,
            total,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberSort {
    #[default]
    Name,
    Status,
}

/// Search box and sort selector of a group or zone card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberQuery {
    /// Case-insensitive substring over name and email. Blank means no
    /// filter.
    pub search: Option<String>,
    pub sort: MemberSort,
}

impl MemberQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Default::default()
        }
    }

    pub fn sorted_by(mut self, sort: MemberSort) -> Self {
        self.sort = sort;
        self
    }

    /// Filter and order `users`. Ties keep key order.
    pub fn apply(&self, users: impl IntoIterator<Item = User>) -> Vec<User> {
        let needle = normalized_needle(self.search.as_deref());
        let mut users: Vec<User> = users
            .into_iter()
            .filter(|u| needle.as_deref().is_none_or(|n| u.matches_contact(n)))
            .collect();
        users.sort_by(|a, b| self.compare(a, b).then(a.id.cmp(&b.id)));
        users
    }

    fn compare(&self, a: &User, b: &User) -> Ordering {
        match self.sort {
            MemberSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            MemberSort::Status => a.status.cmp(&b.status),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Active,
    /// Inactive and pending users.
    NotActive,
}

/// Filters of the main user table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    /// Case-insensitive substring over name, email, company and position.
    pub search: Option<String>,
    pub activity: Option<Activity>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        let needle = normalized_needle(self.search.as_deref());
        let text_ok = needle.as_deref().is_none_or(|n| user.matches_profile(n));
        let activity_ok = match self.activity {
            None => true,
            Some(Activity::Active) => user.status.is_active(),
            Some(Activity::NotActive) => !user.status.is_active(),
        };
        text_ok && activity_ok
    }
}

fn normalized_needle(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}
