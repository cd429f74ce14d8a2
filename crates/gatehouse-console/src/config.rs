//! Console configuration, read from the environment.

use std::path::PathBuf;

use gatehouse_access::{AccessConfig, ValidityPolicy};
use gatehouse_core::error::GatehouseResult;
use gatehouse_store::StoreConfig;

/// Fixture path replacing the built-in seed.
pub const SEED_VAR: &str = "GATEHOUSE_SEED";
/// `first-match`, `any-window` or `all-windows`.
pub const VALIDITY_VAR: &str = "GATEHOUSE_VALIDITY";

#[derive(Debug, Clone, Default)]
pub struct ConsoleConfig {
    pub store: StoreConfig,
    pub access: AccessConfig,
}

impl ConsoleConfig {
    pub fn from_env() -> GatehouseResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> GatehouseResult<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        if let Some(path) = var(SEED_VAR) {
            config.store.seed_path = Some(PathBuf::from(path));
        }
        if let Some(policy) = var(VALIDITY_VAR) {
            config.access.validity_policy = policy.parse::<ValidityPolicy>()?;
        }
        Ok(config)
    }
}
