//! Repository Layer - Core Traits
//!
//! Document-style storage for task lists. Every call is scoped to one user
//! and a list's task forest is only ever replaced as a whole.

use async_trait::async_trait;
use task_tree::{ListId, TaskList, TaskNode};

use crate::domain::DomainResult;

#[async_trait]
pub trait ListDocuments: Send + Sync {
    /// Lists of a user in creation order
    async fn fetch(&self, user_id: &str) -> DomainResult<Vec<TaskList>>;

    /// Create an empty list and return it with its new id
    async fn create(&self, user_id: &str, name: &str) -> DomainResult<TaskList>;

    /// Replace the whole task forest of a list
    async fn replace_tasks(&self, user_id: &str, list_id: &ListId, tasks: &[TaskNode]) -> DomainResult<()>;

    async fn rename(&self, user_id: &str, list_id: &ListId, name: &str) -> DomainResult<()>;

    async fn delete(&self, user_id: &str, list_id: &ListId) -> DomainResult<()>;
}
