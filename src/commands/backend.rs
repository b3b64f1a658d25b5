//! Backend Ports
//!
//! Implements the task engine's persistence and generation ports on top of
//! the Tauri commands.

use async_trait::async_trait;
use task_tree::{ListId, ListPersistence, PortError, SubtaskGenerator, TaskList, TaskNode};

#[derive(Clone, Copy, Default)]
pub struct TauriBackend;

#[async_trait(?Send)]
impl ListPersistence for TauriBackend {
    async fn fetch_lists(&self, user_id: &str) -> Result<Vec<TaskList>, PortError> {
        Ok(super::fetch_lists(user_id).await?)
    }

    async fn create_list(&self, name: &str) -> Result<ListId, PortError> {
        Ok(ListId::new(super::create_list(name).await?))
    }

    async fn replace_list_tasks(&self, list_id: &ListId, tasks: &[TaskNode]) -> Result<(), PortError> {
        Ok(super::replace_list_tasks(list_id.as_str(), tasks).await?)
    }

    async fn rename_list(&self, list_id: &ListId, name: &str) -> Result<(), PortError> {
        Ok(super::rename_list(list_id.as_str(), name).await?)
    }

    async fn delete_list(&self, list_id: &ListId) -> Result<(), PortError> {
        Ok(super::delete_list(list_id.as_str()).await?)
    }
}

#[async_trait(?Send)]
impl SubtaskGenerator for TauriBackend {
    async fn generate_subtasks(&self, prompt: &str) -> Result<String, PortError> {
        Ok(super::generate_subtasks(prompt).await?)
    }
}
