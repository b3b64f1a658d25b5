//! Domain Layer - Errors
//!
//! Failures raised by the repository, config loader and AI client. They are
//! stringified at the command boundary.

use serde::{Deserialize, Serialize};
use task_tree::TaskError;

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainError {
    NotFound(String),
    InvalidInput(String),
    Conflict(String),
    Internal(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<TaskError> for DomainError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::InvalidTarget(msg) => DomainError::NotFound(msg),
            TaskError::Validation(msg) => DomainError::InvalidInput(msg),
            TaskError::Persistence(msg) | TaskError::Generation(msg) => DomainError::Internal(msg),
        }
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(err: rusqlite::Error) -> Self {
        DomainError::Internal(err.to_string())
    }
}
