//! Domain Layer - Errors
//!
//! Hard failures (`TaskError`) and the soft AI format degradation (`FormatError`).

use serde::{Deserialize, Serialize};

/// Common result type for task tree operations
pub type TaskResult<T> = Result<T, TaskError>;

/// Failures surfaced by the coordinator and the decomposition adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskError {
    /// Mutation addressed at a placeholder, pending or unknown list (or task parent)
    InvalidTarget(String),
    /// Malformed input rejected before any optimistic apply
    Validation(String),
    /// Whole-tree write failed after the optimistic apply; state was rolled back
    Persistence(String),
    /// The text-generation call itself failed; nothing was created
    Generation(String),
}

impl TaskError {
    /// Short label used in user-facing notices
    pub fn kind(&self) -> &'static str {
        match self {
            TaskError::InvalidTarget(_) => "invalid target",
            TaskError::Validation(_) => "validation",
            TaskError::Persistence(_) => "persistence",
            TaskError::Generation(_) => "generation",
        }
    }
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskError::InvalidTarget(msg) => write!(f, "Invalid target: {}", msg),
            TaskError::Validation(msg) => write!(f, "Invalid input: {}", msg),
            TaskError::Persistence(msg) => write!(f, "Could not save changes: {}", msg),
            TaskError::Generation(msg) => write!(f, "AI subtask generation failed: {}", msg),
        }
    }
}

impl std::error::Error for TaskError {}

/// Why a generated subtask payload could not be used.
///
/// Never fails the whole decomposition: the parent task is still created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatError {
    /// Payload was not valid JSON
    Unparseable(String),
    /// Payload was JSON but not an array
    NotAnArray,
    /// Array contained no element with a usable name and priority
    NoValidEntries,
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::Unparseable(msg) => write!(f, "response was not valid JSON ({})", msg),
            FormatError::NotAnArray => write!(f, "response was not a JSON array"),
            FormatError::NoValidEntries => write!(f, "response contained no usable subtasks"),
        }
    }
}

impl std::error::Error for FormatError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_failing_step() {
        let err = TaskError::Generation("timeout".into());
        assert!(err.to_string().starts_with("AI subtask generation failed"));
        assert_eq!(err.kind(), "generation");
    }
}
