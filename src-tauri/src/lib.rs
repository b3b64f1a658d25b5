//! TaskDeck Backend
//!
//! Layered architecture:
//! - domain: Errors and the stored list document
//! - repository: SQLite document store for task lists
//! - commands: Tauri command handlers
//! - ai: Anthropic client for subtask generation

use std::path::PathBuf;
use std::sync::Arc;

use task_tree::TaskTreeConfig;
use tauri::Manager;

mod ai;
mod commands;
mod config;
mod domain;
mod repository;

use ai::AnthropicClient;
use config::AppConfig;
use repository::{init_db, ListDocuments, ListRepository};

/// Application state shared across commands
pub struct AppState {
    pub config: AppConfig,
    pub lists: Arc<dyn ListDocuments>,
    pub ai: AnthropicClient,
}

fn app_dir(dir: Result<PathBuf, tauri::Error>, what: &str) -> Result<PathBuf, String> {
    let dir = dir.map_err(|e| format!("Failed to resolve {} dir: {}", what, e))?;
    std::fs::create_dir_all(&dir).map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
    Ok(dir)
}

fn build_state(app_handle: &tauri::AppHandle) -> Result<AppState, String> {
    let config_dir = app_dir(app_handle.path().app_config_dir(), "config")?;
    let data_dir = app_dir(app_handle.path().app_data_dir(), "data")?;

    let config = AppConfig::load(&config_dir).map_err(|e| e.to_string())?;
    let db_path = data_dir.join(&config.database_file);
    let db_state = tauri::async_runtime::block_on(init_db(&db_path)).map_err(|e| e.to_string())?;
    log::info!("Database ready at {}", db_path.display());

    let ai = AnthropicClient::new(config.anthropic.clone()).map_err(|e| e.to_string())?;
    if !ai.is_configured() {
        log::warn!("No Anthropic API key, AI subtasks are unavailable");
    }
    match &config.user_id {
        Some(user) => log::info!("Signed in as {}", user),
        None => log::info!("No user configured, running in preview mode"),
    }

    Ok(AppState {
        // Same name bound the frontend engine enforces
        lists: Arc::new(ListRepository::new(db_state.conn, TaskTreeConfig::default().max_name_len)),
        config,
        ai,
    })
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .setup(|app| {
            // Single instance check - must be first!
            #[cfg(desktop)]
            app.handle().plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
                // Focus the existing window when a new instance tries to start
                if let Some(window) = app.get_webview_window("main") {
                    let _ = window.set_focus();
                }
            }))?;

            let app_handle = app.handle().clone();

            let log_dir = app_dir(app_handle.path().app_log_dir(), "log")?;
            rolling_logger::init_logger(log_dir, "TaskDeck")?;

            let state = build_state(&app_handle).inspect_err(|e| {
                let _ = rolling_logger::error(&format!("Startup failed: {}", e));
            })?;
            app.manage(state);
            let _ = rolling_logger::info("TaskDeck started");
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Session
            commands::get_session,
            commands::recent_logs,
            // Task lists
            commands::fetch_lists,
            commands::create_list,
            commands::replace_list_tasks,
            commands::rename_list,
            commands::delete_list,
            // AI
            commands::generate_subtasks,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
