//! Domain models for Gatehouse.
//!
//! These are the core types shared across all crates.

pub mod access_rule;
pub mod group;
pub mod ids;
pub mod membership;
pub mod shift;
pub mod stats;
pub mod user;
pub mod zone;
