//! Task List Entity
//!
//! A named list owning a forest of top-level tasks. Identity is assigned by the
//! backend; preview and not-yet-created lists carry marker ids instead.

use serde::{Deserialize, Serialize};

use super::task::TaskNode;

const PLACEHOLDER_PREFIX: &str = "placeholder-";
const PENDING_PREFIX: &str = "pending-";

/// What kind of identity a list carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Assigned by the backend; the only kind that may be mutated
    Persisted,
    /// Signed-out preview content, read-only and never sent to storage
    Placeholder,
    /// Optimistically created, waiting for the backend id
    Pending,
}

/// List identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(String);

impl ListId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn placeholder(n: usize) -> Self {
        Self(format!("{}{}", PLACEHOLDER_PREFIX, n))
    }

    pub fn pending(n: u64) -> Self {
        Self(format!("{}{}", PENDING_PREFIX, n))
    }

    pub fn kind(&self) -> ListKind {
        if self.0.starts_with(PLACEHOLDER_PREFIX) {
            ListKind::Placeholder
        } else if self.0.starts_with(PENDING_PREFIX) {
            ListKind::Pending
        } else {
            ListKind::Persisted
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.kind() == ListKind::Persisted
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind() == ListKind::Placeholder
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A named list of task trees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<TaskNode>,
    /// Storage held tasks that could not be decoded; `tasks` is empty and the
    /// list must not be written until the data is repaired
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unreadable: bool,
}

impl TaskList {
    pub fn new(id: ListId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tasks: Vec::new(),
            unreadable: false,
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<TaskNode>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn is_read_only(&self) -> bool {
        !self.id.is_persisted() || self.unreadable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_kinds() {
        assert_eq!(ListId::new("65f0c2").kind(), ListKind::Persisted);
        assert_eq!(ListId::placeholder(1).kind(), ListKind::Placeholder);
        assert_eq!(ListId::pending(7).kind(), ListKind::Pending);
    }

    #[test]
    fn test_placeholder_list_is_read_only() {
        let list = TaskList::new(ListId::placeholder(0), "Preview");
        assert!(list.is_read_only());
        assert!(!TaskList::new(ListId::new("abc"), "Real").is_read_only());
    }

    #[test]
    fn test_missing_tasks_default_to_empty() {
        let list: TaskList = serde_json::from_str(r#"{"id":"l1","name":"Inbox"}"#).unwrap();
        assert!(list.tasks.is_empty());
        assert_eq!(list.id.as_str(), "l1");
    }
}
