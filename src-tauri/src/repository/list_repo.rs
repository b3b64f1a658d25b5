//! Task List Repository
//!
//! SQLite implementation of [`ListDocuments`]: one row per list with the task
//! forest serialized into the `tasks` column.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use task_tree::tree::validate_forest;
use task_tree::{ListId, TaskList, TaskNode};
use tokio::sync::Mutex;

use super::ListDocuments;
use crate::domain::{DomainError, DomainResult, ListRecord};

pub struct ListRepository {
    conn: Arc<Mutex<Option<Connection>>>,
    max_name_len: usize,
}

impl ListRepository {
    pub fn new(conn: Arc<Mutex<Option<Connection>>>, max_name_len: usize) -> Self {
        Self { conn, max_name_len }
    }

    fn not_ready() -> DomainError {
        DomainError::Internal("Database not initialized".to_string())
    }

    fn check_name(&self, name: &str) -> DomainResult<String> {
        Ok(TaskNode::validate_name(name, self.max_name_len)?)
    }
}

#[async_trait]
impl ListDocuments for ListRepository {
    async fn fetch(&self, user_id: &str) -> DomainResult<Vec<TaskList>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(Self::not_ready)?;

        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, tasks, created_at, updated_at
             FROM task_lists WHERE user_id = ?1 ORDER BY created_at, rowid",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            let id: String = row.get(0)?;
            let raw: String = row.get(3)?;
            let tasks = ListRecord::decode_tasks(&id, &raw);
            Ok(ListRecord {
                unreadable: tasks.is_none(),
                tasks: tasks.unwrap_or_default(),
                id,
                user_id: row.get(1)?,
                name: row.get(2)?,
                created_at: row.get(4)?,
                updated_at: row.get(5)?,
            })
        })?;

        let mut lists = Vec::new();
        for record in rows {
            lists.push(record?.into_task_list());
        }
        log::debug!("Fetched {} lists for {}", lists.len(), user_id);
        Ok(lists)
    }

    async fn create(&self, user_id: &str, name: &str) -> DomainResult<TaskList> {
        let name = self.check_name(name)?;
        let record = ListRecord::new(uuid::Uuid::new_v4().to_string(), user_id.to_string(), name);

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(Self::not_ready)?;
        conn.execute(
            "INSERT INTO task_lists (id, user_id, name, tasks, created_at, updated_at)
             VALUES (?1, ?2, ?3, '[]', ?4, ?5)",
            params![record.id, record.user_id, record.name, record.created_at, record.updated_at],
        )?;

        log::info!("Created list {} for {}", record.id, user_id);
        Ok(record.into_task_list())
    }

    async fn replace_tasks(&self, user_id: &str, list_id: &ListId, tasks: &[TaskNode]) -> DomainResult<()> {
        validate_forest(tasks, self.max_name_len)?;
        let raw = serde_json::to_string(tasks).map_err(|e| DomainError::Internal(e.to_string()))?;
        let now = chrono::Local::now().timestamp_millis();

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(Self::not_ready)?;

        // Never replace a column we could not read; it may be repairable
        let stored: Option<String> = conn
            .query_row(
                "SELECT tasks FROM task_lists WHERE id = ?1 AND user_id = ?2",
                params![list_id.as_str(), user_id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(stored) = stored else {
            return Err(DomainError::NotFound(format!("list {}", list_id)));
        };
        if ListRecord::decode_tasks(list_id.as_str(), &stored).is_none() {
            return Err(DomainError::Conflict(format!(
                "stored tasks of list {} are unreadable and were left untouched",
                list_id
            )));
        }

        conn.execute(
            "UPDATE task_lists SET tasks = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4",
            params![raw, now, list_id.as_str(), user_id],
        )?;
        Ok(())
    }

    async fn rename(&self, user_id: &str, list_id: &ListId, name: &str) -> DomainResult<()> {
        let name = self.check_name(name)?;
        let now = chrono::Local::now().timestamp_millis();

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(Self::not_ready)?;
        let changed = conn.execute(
            "UPDATE task_lists SET name = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4",
            params![name, now, list_id.as_str(), user_id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("list {}", list_id)));
        }
        Ok(())
    }

    async fn delete(&self, user_id: &str, list_id: &ListId) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(Self::not_ready)?;
        let changed = conn.execute(
            "DELETE FROM task_lists WHERE id = ?1 AND user_id = ?2",
            params![list_id.as_str(), user_id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("list {}", list_id)));
        }
        log::info!("Deleted list {}", list_id);
        Ok(())
    }
}
