//! AI Commands

use tauri::State;

use crate::AppState;

/// Run a prompt through the configured model and return its raw text
#[tauri::command]
pub async fn generate_subtasks(state: State<'_, AppState>, prompt: String) -> Result<String, String> {
    if prompt.trim().is_empty() {
        return Err("Prompt must not be empty".to_string());
    }
    state.ai.complete(&prompt).await.map_err(|e| e.to_string())
}
