//! Error types for the Gatehouse system.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatehouseError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity is locked: {entity} with id {id}")]
    Locked { entity: String, id: String },

    #[error("Entity already exists: {entity} named {name}")]
    AlreadyExists { entity: String, name: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatehouseError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn locked(entity: &str, id: impl ToString) -> Self {
        Self::Locked {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

pub type GatehouseResult<T> = Result<T, GatehouseError>;
