//! Group domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::GroupId;
use crate::error::GatehouseError;

/// Employment category of a group.
///
/// Every category except [`GroupType::FullTime`] is time-bounded and must
/// carry a [`DateRange`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GroupType {
    #[serde(rename = "Full Time")]
    FullTime,
    #[serde(rename = "Part Time")]
    PartTime,
    Visitor,
    Contractor,
}

impl GroupType {
    pub fn is_time_bounded(self) -> bool {
        self != GroupType::FullTime
    }
}

/// Inclusive validity window of a time-bounded group.
///
/// Serialized as a two-element array `[start, end]` of RFC 3339 strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(
    try_from = "(DateTime<Utc>, DateTime<Utc>)",
    into = "(DateTime<Utc>, DateTime<Utc>)"
)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, GatehouseError> {
        if end < start {
            return Err(GatehouseError::validation(format!(
                "date range ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// `start <= at <= end`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Overlap of two windows, or `None` when they are disjoint.
    pub fn intersect(&self, other: &DateRange) -> Option<DateRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(DateRange { start, end })
    }
}

impl TryFrom<(DateTime<Utc>, DateTime<Utc>)> for DateRange {
    type Error = GatehouseError;

    fn try_from((start, end): (DateTime<Utc>, DateTime<Utc>)) -> Result<Self, Self::Error> {
        DateRange::new(start, end)
    }
}

impl From<DateRange> for (DateTime<Utc>, DateTime<Utc>) {
    fn from(range: DateRange) -> Self {
        (range.start, range.end)
    }
}

/// A named set of users sharing an employment category.
///
/// Groups can be assigned to zones as a whole, which grants every member
/// access to the zone. A locked group rejects membership changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    /// Unique within the directory.
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    pub company: Option<String>,
    /// Present only for time-bounded group types.
    pub date_range: Option<DateRange>,
    pub locked: bool,
}

impl Group {
    /// The validity window, if this group restricts access in time.
    pub fn access_window(&self) -> Option<DateRange> {
        if self.group_type.is_time_bounded() {
            self.date_range
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    pub company: Option<String>,
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateGroup {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub group_type: Option<GroupType>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub company: Option<Option<String>>,
    pub date_range: Option<Option<DateRange>>,
}

/// Checks the type / date range pairing and returns the range to store.
///
/// Full Time groups never keep a range; every other type requires one.
pub fn validate_schedule(
    group_type: GroupType,
    date_range: Option<DateRange>,
) -> Result<Option<DateRange>, GatehouseError> {
    match (group_type.is_time_bounded(), date_range) {
        (false, _) => Ok(None),
        (true, Some(range)) => Ok(Some(range)),
        (true, None) => Err(GatehouseError::validation(format!(
            "group type {group_type:?} requires a date range"
        ))),
    }
}
