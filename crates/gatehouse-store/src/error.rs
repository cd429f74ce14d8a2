//! Store-specific error types and conversions.

use gatehouse_core::error::GatehouseError;

/// Errors raised while loading or exporting a directory document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid fixture: {0}")]
    Fixture(String),
}

impl From<StoreError> for GatehouseError {
    fn from(err: StoreError) -> Self {
        GatehouseError::Fixture(err.to_string())
    }
}
