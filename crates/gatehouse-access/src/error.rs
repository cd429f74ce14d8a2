//! Access evaluation error types.

use gatehouse_core::error::GatehouseError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("unknown validity policy {0:?} (expected first-match, any-window or all-windows)")]
    UnknownPolicy(String),
}

impl From<AccessError> for GatehouseError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::UnknownPolicy(_) => GatehouseError::Validation {
                message: err.to_string(),
            },
        }
    }
}
