//! Task List Commands
//!
//! Frontend bindings for the backend's list document store.

use serde::Serialize;
use task_tree::{TaskList, TaskNode};

use super::call;

// ========================
// Argument Structs
// ========================

#[derive(Serialize)]
struct UserArgs<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
}

#[derive(Serialize)]
struct NameArgs<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct ListIdArgs<'a> {
    #[serde(rename = "listId")]
    list_id: &'a str,
}

#[derive(Serialize)]
struct ReplaceTasksArgs<'a> {
    #[serde(rename = "listId")]
    list_id: &'a str,
    tasks: &'a [TaskNode],
}

#[derive(Serialize)]
struct RenameArgs<'a> {
    #[serde(rename = "listId")]
    list_id: &'a str,
    name: &'a str,
}

// ========================
// Commands
// ========================

pub async fn fetch_lists(user_id: &str) -> Result<Vec<TaskList>, String> {
    call("fetch_lists", &UserArgs { user_id }).await
}

/// Returns the new list's id
pub async fn create_list(name: &str) -> Result<String, String> {
    call("create_list", &NameArgs { name }).await
}

pub async fn replace_list_tasks(list_id: &str, tasks: &[TaskNode]) -> Result<(), String> {
    call("replace_list_tasks", &ReplaceTasksArgs { list_id, tasks }).await
}

pub async fn rename_list(list_id: &str, name: &str) -> Result<(), String> {
    call("rename_list", &RenameArgs { list_id, name }).await
}

pub async fn delete_list(list_id: &str) -> Result<(), String> {
    call("delete_list", &ListIdArgs { list_id }).await
}
