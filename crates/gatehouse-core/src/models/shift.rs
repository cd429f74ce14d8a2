//! Shift domain model.
//!
//! Shifts are reference data: membership operations never change them,
//! only the operator's shift editor does.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::ids::{ShiftId, UserId};
use crate::error::GatehouseError;

const CLOCK_FORMAT: &str = "%H:%M";

/// A working period, e.g. `Morning Shift (08:00-16:00)`.
///
/// `end_time` may be earlier than `start_time` for shifts crossing
/// midnight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shift {
    pub id: ShiftId,
    pub name: String,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    pub user_ids: BTreeSet<UserId>,
}

impl Shift {
    /// Display label used by the user table.
    pub fn label(&self) -> String {
        format!(
            "{} ({}-{})",
            self.name,
            self.start_time.format(CLOCK_FORMAT),
            self.end_time.format(CLOCK_FORMAT)
        )
    }

    pub fn covers(&self, user: UserId) -> bool {
        self.user_ids.contains(&user)
    }
}

/// Times are `HH:mm` strings as typed by the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShift {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub user_ids: Vec<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateShift {
    pub name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// Replaces the whole user list.
    pub user_ids: Option<Vec<UserId>>,
}

/// Parse an `HH:mm` wall-clock string.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, GatehouseError> {
    NaiveTime::parse_from_str(value, CLOCK_FORMAT)
        .map_err(|e| GatehouseError::validation(format!("invalid HH:mm time {value:?}: {e}")))
}

/// Serde adapter for `HH:mm` strings.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(super::CLOCK_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock_time(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_uses_hh_mm() {
        let shift = Shift {
            id: ShiftId(1),
            name: "Morning Shift".into(),
            start_time: parse_clock_time("08:00").unwrap(),
            end_time: parse_clock_time("16:00").unwrap(),
            user_ids: BTreeSet::from([UserId(1)]),
        };
        assert_eq!(shift.label(), "Morning Shift (08:00-16:00)");
        assert!(shift.covers(UserId(1)));
        assert!(!shift.covers(UserId(2)));
    }

    #[test]
    fn malformed_time_is_a_validation_error() {
        assert!(matches!(
            parse_clock_time("8 o'clock"),
            Err(GatehouseError::Validation { .. })
        ));
        assert!(parse_clock_time("24:00").is_err());
    }
}
