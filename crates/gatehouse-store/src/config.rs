//! Store configuration.

use std::path::PathBuf;

/// Where the store takes its initial collections from.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// JSON fixture to load instead of the built-in seed.
    pub seed_path: Option<PathBuf>,
    /// Start from the seed (or `seed_path`) rather than empty collections.
    pub seed: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            seed: true,
        }
    }
}
