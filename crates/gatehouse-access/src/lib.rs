//! Gatehouse Access: time-bounded access validity and the access rule /
//! shift lookups shown next to each user.

pub mod config;
pub mod error;
pub mod service;

pub use config::{AccessConfig, ValidityPolicy};
pub use error::AccessError;
pub use service::{AccessService, AccessValidity};
