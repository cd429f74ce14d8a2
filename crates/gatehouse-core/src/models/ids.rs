//! Typed entity keys.
//!
//! Every collection is keyed by a plain integer in the seed fixture. The
//! newtypes keep a user key from being passed where a group key is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(key: u64) -> Self {
                Self(key)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// Key of a [`User`](super::user::User).
    UserId
);
entity_id!(
    /// Key of a [`Group`](super::group::Group).
    GroupId
);
entity_id!(
    /// Key of a [`Zone`](super::zone::Zone).
    ZoneId
);
entity_id!(AccessRuleId);
entity_id!(ShiftId);
