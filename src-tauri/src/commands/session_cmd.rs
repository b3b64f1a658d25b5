//! Session Commands
//!
//! The configured user id doubles as the signed-in marker: without one the
//! frontend shows the read-only preview lists.

use tauri::State;

use crate::AppState;

/// User id of the current session, if signed in
#[tauri::command]
pub async fn get_session(state: State<'_, AppState>) -> Result<Option<String>, String> {
    Ok(state.config.user_id.clone())
}

/// Recent backend log lines, oldest first
#[tauri::command]
pub async fn recent_logs() -> Result<Vec<String>, String> {
    Ok(rolling_logger::recent_lines())
}

/// The signed-in user, or an error for preview sessions
pub(crate) fn signed_in_user(user_id: Option<&str>) -> Result<&str, String> {
    user_id.ok_or_else(|| "Not signed in".to_string())
}
