//! Gatehouse Store: the in-memory membership store.
//!
//! This crate provides:
//! - The store itself ([`MembershipStore`]) implementing every
//!   `gatehouse-core` repository trait
//! - Fixture loading and export ([`DirectoryDocument`])
//! - Configuration ([`StoreConfig`]) and error types ([`StoreError`])

mod config;
mod document;
mod error;
mod index;
mod repository;
mod store;

pub use config::StoreConfig;
pub use document::{
    AccessRuleRecord, DirectoryDocument, GroupRecord, SEED_JSON, ShiftRecord, UserRecord,
    ZoneRecord,
};
pub use error::StoreError;
pub use store::MembershipStore;
