//! Domain-level error types.

use std::fmt;

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// The account attribute a registry keeps unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    UserId,
    UserName,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::UserId => f.write_str("User ID"),
            UniqueField::UserName => f.write_str("User name"),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{field} already exists")]
    Conflict { field: UniqueField },

    #[error("Entity not found")]
    NotFound,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            conflict @ RepoError::Conflict { .. } => DomainError::Conflict(conflict.to_string()),
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "record",
                id: String::new(),
            },
            RepoError::Unavailable(msg) => DomainError::Internal(msg),
        }
    }
}
