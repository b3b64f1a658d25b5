//! Database Connection and Setup
//!
//! Opens the SQLite file and runs migrations.

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared handle to the single connection
#[derive(Clone)]
pub struct DbState {
    pub conn: Arc<Mutex<Option<Connection>>>,
}

impl DbState {
    pub fn empty() -> Self {
        Self { conn: Arc::new(Mutex::new(None)) }
    }
}

/// Open (or create) the database at `db_path`; `:memory:` is accepted
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = if db_path.as_os_str() == ":memory:" {
        Connection::open_in_memory()?
    } else {
        Connection::open(db_path)?
    };
    run_migrations(&conn)?;

    let state = DbState::empty();
    *state.conn.lock().await = Some(conn);
    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS task_lists (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            tasks TEXT NOT NULL DEFAULT '[]',
            created_at INTEGER NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_task_lists_user ON task_lists(user_id);",
    )
    .map_err(|e| DomainError::Internal(format!("Failed to create task_lists: {}", e)))?;

    // Added after the first release
    if !column_exists(conn, "task_lists", "updated_at")? {
        conn.execute("ALTER TABLE task_lists ADD COLUMN updated_at INTEGER NOT NULL DEFAULT 0", [])
            .map_err(|e| DomainError::Internal(format!("Failed to add updated_at: {}", e)))?;
    }

    Ok(())
}
