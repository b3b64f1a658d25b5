//! Collaborator Ports
//!
//! The engine's only view of the outside world: a document store that replaces
//! a list's whole task tree, and an opaque text generator. Futures are not
//! required to be `Send` so browser promise-backed implementations fit.

use async_trait::async_trait;

use crate::domain::{ListId, TaskList, TaskNode};

/// Failure reported by a collaborator (network error, rejection, non-success status)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortError(pub String);

impl PortError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl std::fmt::Display for PortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for PortError {}

impl From<String> for PortError {
    fn from(msg: String) -> Self {
        Self(msg)
    }
}

/// Durable storage for task lists, one document per list
#[async_trait(?Send)]
pub trait ListPersistence {
    /// All lists of a user, with missing task fields defaulted
    async fn fetch_lists(&self, user_id: &str) -> Result<Vec<TaskList>, PortError>;

    /// Create an empty list and return its identity
    async fn create_list(&self, name: &str) -> Result<ListId, PortError>;

    /// Whole-tree replace of a list's `tasks` field
    async fn replace_list_tasks(&self, list_id: &ListId, tasks: &[TaskNode]) -> Result<(), PortError>;

    async fn rename_list(&self, list_id: &ListId, name: &str) -> Result<(), PortError>;

    async fn delete_list(&self, list_id: &ListId) -> Result<(), PortError>;
}

/// Opaque text generation: prompt in, raw model text out
#[async_trait(?Send)]
pub trait SubtaskGenerator {
    async fn generate_subtasks(&self, prompt: &str) -> Result<String, PortError>;
}
