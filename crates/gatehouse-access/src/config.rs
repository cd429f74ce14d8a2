//! Access evaluation configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;

/// How a user in several time-bounded groups is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidityPolicy {
    /// Only the first time-bounded group (in directory order) counts.
    #[default]
    FirstMatch,
    /// Valid while any window is open.
    AnyWindow,
    /// Valid only while every window is open.
    AllWindows,
}

impl ValidityPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidityPolicy::FirstMatch => "first-match",
            ValidityPolicy::AnyWindow => "any-window",
            ValidityPolicy::AllWindows => "all-windows",
        }
    }
}

impl fmt::Display for ValidityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidityPolicy {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-match" => Ok(ValidityPolicy::FirstMatch),
            "any-window" => Ok(ValidityPolicy::AnyWindow),
            "all-windows" => Ok(ValidityPolicy::AllWindows),
            _ => Err(AccessError::UnknownPolicy(s.into())),
        }
    }
}

/// Configuration for the access service.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    pub validity_policy: ValidityPolicy,
    /// Rendered when a user has no access rules or no shift (default: `-`).
    pub placeholder: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            validity_policy: ValidityPolicy::default(),
            placeholder: "-".into(),
        }
    }
}
