//! Task List Commands
//!
//! Document-store operations behind the frontend's persistence port. Every
//! command acts on the signed-in user's lists only.

use tauri::State;
use task_tree::{ListId, TaskList, TaskNode};

use super::session_cmd::signed_in_user;
use crate::AppState;

#[tauri::command]
pub async fn fetch_lists(state: State<'_, AppState>, user_id: String) -> Result<Vec<TaskList>, String> {
    let current = signed_in_user(state.config.user_id.as_deref())?;
    if current != user_id {
        return Err(format!("Cannot read lists of {}", user_id));
    }
    state.lists.fetch(current).await.map_err(|e| e.to_string())
}

/// Create an empty list and return its id
#[tauri::command]
pub async fn create_list(state: State<'_, AppState>, name: String) -> Result<String, String> {
    let user = signed_in_user(state.config.user_id.as_deref())?;
    let list = state.lists.create(user, &name).await.map_err(|e| e.to_string())?;
    Ok(list.id.as_str().to_string())
}

/// Replace a list's whole task tree
#[tauri::command]
pub async fn replace_list_tasks(
    state: State<'_, AppState>,
    list_id: String,
    tasks: Vec<TaskNode>,
) -> Result<(), String> {
    let user = signed_in_user(state.config.user_id.as_deref())?;
    state
        .lists
        .replace_tasks(user, &ListId::new(list_id), &tasks)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn rename_list(state: State<'_, AppState>, list_id: String, name: String) -> Result<(), String> {
    let user = signed_in_user(state.config.user_id.as_deref())?;
    state
        .lists
        .rename(user, &ListId::new(list_id), &name)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_list(state: State<'_, AppState>, list_id: String) -> Result<(), String> {
    let user = signed_in_user(state.config.user_id.as_deref())?;
    state
        .lists
        .delete(user, &ListId::new(list_id))
        .await
        .map_err(|e| e.to_string())
}
