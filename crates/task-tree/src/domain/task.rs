//! Task Node Entity
//!
//! The atomic record of a task list: a named task with a completion flag,
//! a priority and an ordered list of subtasks of unbounded depth.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{TaskError, TaskResult};

/// Client-generated task identity, unique within a list's whole tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| TaskError::Validation(format!("bad task id {:?}: {}", s, e)))
    }
}

/// Task priority, persisted as its integer level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    #[default]
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::None, Priority::Low, Priority::Medium, Priority::High];

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::None => "None",
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = TaskError;

    /// Out-of-range levels are a caller error, never clamped
    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Priority::None),
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            other => Err(TaskError::Validation(format!(
                "priority must be between 0 and 3, got {}",
                other
            ))),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.level()
    }
}

/// A task with recursive subtasks.
///
/// Missing `id`, `completed`, `priority` and `subtasks` fields are defaulted on
/// deserialization so stored documents never yield an undefined required field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    #[serde(default)]
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub subtasks: Vec<TaskNode>,
}

impl TaskNode {
    /// New incomplete task with no priority and no subtasks
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            name: name.into(),
            completed: false,
            priority: Priority::None,
            subtasks: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_subtasks(mut self, subtasks: Vec<TaskNode>) -> Self {
        self.subtasks = subtasks;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.subtasks.is_empty()
    }

    /// Trim and bound-check a display name, returning the trimmed form
    pub fn validate_name(name: &str, max_len: usize) -> TaskResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TaskError::Validation("name must not be empty".into()));
        }
        let len = trimmed.chars().count();
        if len > max_len {
            return Err(TaskError::Validation(format!(
                "name is {} characters, the limit is {}",
                len, max_len
            )));
        }
        Ok(trimmed.to_string())
    }
}
