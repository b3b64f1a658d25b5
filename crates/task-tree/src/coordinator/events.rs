//! Events emitted by the coordinator to the presentation layer.

use crate::domain::{ListId, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A human-readable message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The store's lists changed (optimistic apply, commit, rollback or fetch)
    ListsChanged,
    /// A committed toggle marked a task completed
    TaskCompleted { list_id: ListId, task_id: TaskId },
    /// A committed toggle completed every task of a list
    ListCompleted { list_id: ListId },
    /// A signed-out visitor tried to edit preview content
    SignInRequired,
    Notice(Notice),
}
