//! Stored task list document
//!
//! One row per list. The whole task forest lives in a single JSON column and
//! is always replaced as a unit.

use serde::{Deserialize, Serialize};
use task_tree::tree::dedupe_ids;
use task_tree::{ListId, TaskList, TaskNode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub tasks: Vec<TaskNode>,
    /// The `tasks` column did not decode
    #[serde(default)]
    pub unreadable: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ListRecord {
    pub fn new(id: String, user_id: String, name: String) -> Self {
        let now = chrono::Local::now().timestamp_millis();
        Self {
            id,
            user_id,
            name,
            tasks: Vec::new(),
            unreadable: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Decode the `tasks` column. Missing node fields take their defaults and
    /// colliding ids are re-issued; `None` when the column is unreadable.
    pub fn decode_tasks(list_id: &str, raw: &str) -> Option<Vec<TaskNode>> {
        let forest: Vec<TaskNode> = match serde_json::from_str(raw) {
            Ok(forest) => forest,
            Err(e) => {
                log::warn!("Unreadable tasks for list {}: {}", list_id, e);
                return None;
            }
        };
        let (forest, reissued) = dedupe_ids(&forest);
        if reissued > 0 {
            log::warn!("Re-issued {} duplicate task ids in list {}", reissued, list_id);
        }
        Some(forest)
    }

    pub fn into_task_list(self) -> TaskList {
        let mut list = TaskList::new(ListId::new(self.id), self.name).with_tasks(self.tasks);
        list.unreadable = self.unreadable;
        list
    }
}
