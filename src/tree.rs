//! Tree Utilities
//!
//! Flattens a task forest into display rows. Siblings are shown in display
//! order while each row remembers its stored position, which is what reorder
//! operates on.

use std::collections::HashSet;

use task_tree::tree::{completion_counts, sort_siblings};

use crate::models::{Priority, TaskId, TaskNode};

#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: TaskId,
    pub name: String,
    pub completed: bool,
    pub priority: Priority,
    pub depth: usize,
    pub parent: Option<TaskId>,
    /// Position among siblings in stored order
    pub index: usize,
    /// Stored position of this row when it is shown first in its group
    pub leads_group: Option<usize>,
    /// `(completed, total)` over all descendants; `None` for leaves
    pub progress: Option<(usize, usize)>,
    pub collapsed: bool,
}

/// Rows in display order, skipping the descendants of collapsed tasks
pub fn flatten_rows(forest: &[TaskNode], collapsed: &HashSet<TaskId>) -> Vec<TaskRow> {
    fn collect(
        siblings: &[TaskNode],
        parent: Option<TaskId>,
        depth: usize,
        collapsed: &HashSet<TaskId>,
        rows: &mut Vec<TaskRow>,
    ) {
        for (shown, node) in sort_siblings(siblings).iter().enumerate() {
            let index = siblings
                .iter()
                .position(|n| n.id == node.id)
                .unwrap_or(shown);
            let is_collapsed = collapsed.contains(&node.id);
            rows.push(TaskRow {
                id: node.id,
                name: node.name.clone(),
                completed: node.completed,
                priority: node.priority,
                depth,
                parent,
                index,
                leads_group: (shown == 0).then_some(index),
                progress: (!node.subtasks.is_empty()).then(|| completion_counts(&node.subtasks)),
                collapsed: is_collapsed,
            });
            if !is_collapsed {
                collect(&node.subtasks, Some(node.id), depth + 1, collapsed, rows);
            }
        }
    }

    let mut rows = Vec::new();
    collect(forest, None, 0, collapsed, &mut rows);
    rows
}

/// The name to send when an inline rename closes, if any.
///
/// Enter and the blur that follows both try to commit; only the first one,
/// while the input is still open, counts.
pub fn rename_to_commit(still_editing: bool, draft: &str, original: &str) -> Option<String> {
    let name = draft.trim();
    (still_editing && name != original).then(|| name.to_string())
}
