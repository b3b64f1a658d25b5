//! Display ordering.
//!
//! Applied at render time only; the stored order is never rewritten.

use std::cmp::Reverse;

use crate::domain::{Priority, TaskNode};

/// Incomplete first by priority descending, then completed nodes.
/// Completed nodes share one rank so they keep their stored order.
fn display_rank(node: &TaskNode) -> (bool, Reverse<Priority>) {
    if node.completed {
        (true, Reverse(Priority::None))
    } else {
        (false, Reverse(node.priority))
    }
}

/// Order one sibling group (stable)
pub fn sort_siblings(siblings: &[TaskNode]) -> Vec<TaskNode> {
    let mut sorted = siblings.to_vec();
    sorted.sort_by_key(display_rank);
    sorted
}

/// Order every sibling group in the tree
pub fn sorted_forest(forest: &[TaskNode]) -> Vec<TaskNode> {
    sort_siblings(forest)
        .into_iter()
        .map(|node| TaskNode {
            subtasks: sorted_forest(&node.subtasks),
            ..node
        })
        .collect()
}
