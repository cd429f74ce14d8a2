//! Gatehouse Core: domain models, error taxonomy, queries and repository
//! traits for the access-control membership directory.

pub mod clock;
pub mod error;
pub mod models;
pub mod query;
pub mod repository;
