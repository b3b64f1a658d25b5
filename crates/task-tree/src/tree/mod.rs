//! Tree Operations
//!
//! Pure functions over a forest of task nodes. Every mutation returns a new
//! forest and never touches its input; a `found` flag tells callers whether the
//! target id existed so they can skip persistence when nothing changed.

mod sort;

use std::collections::HashSet;

use crate::domain::{TaskError, TaskId, TaskNode, TaskResult};

pub use sort::{sort_siblings, sorted_forest};

/// Replace the first node (depth-first) whose id matches with `transform(node)`.
///
/// Absent ids return an equal forest and `false`.
pub fn find_and_update<F>(forest: &[TaskNode], id: TaskId, transform: F) -> (Vec<TaskNode>, bool)
where
    F: FnOnce(&TaskNode) -> TaskNode,
{
    let mut transform = Some(transform);
    match update_in(forest, id, &mut transform) {
        Some(updated) => (updated, true),
        None => (forest.to_vec(), false),
    }
}

fn update_in<F>(forest: &[TaskNode], id: TaskId, transform: &mut Option<F>) -> Option<Vec<TaskNode>>
where
    F: FnOnce(&TaskNode) -> TaskNode,
{
    for (index, node) in forest.iter().enumerate() {
        let replacement = if node.id == id {
            let apply = transform.take()?;
            Some(apply(node))
        } else {
            update_in(&node.subtasks, id, transform).map(|subtasks| TaskNode {
                subtasks,
                ..node.clone()
            })
        };

        if let Some(new_node) = replacement {
            let mut updated = forest.to_vec();
            updated[index] = new_node;
            return Some(updated);
        }
    }
    None
}

/// Remove the first node whose id matches, together with its whole subtree.
///
/// Top-level matches are filtered first; otherwise each node's subtasks are
/// searched in order.
pub fn find_and_delete(forest: &[TaskNode], id: TaskId) -> (Vec<TaskNode>, bool) {
    match delete_in(forest, id) {
        Some(updated) => (updated, true),
        None => (forest.to_vec(), false),
    }
}

fn delete_in(forest: &[TaskNode], id: TaskId) -> Option<Vec<TaskNode>> {
    if let Some(position) = forest.iter().position(|node| node.id == id) {
        let mut updated = forest.to_vec();
        updated.remove(position);
        return Some(updated);
    }

    for (index, node) in forest.iter().enumerate() {
        if let Some(subtasks) = delete_in(&node.subtasks, id) {
            let mut updated = forest.to_vec();
            updated[index].subtasks = subtasks;
            return Some(updated);
        }
    }
    None
}

/// Depth-first lookup
pub fn find_by_id(forest: &[TaskNode], id: TaskId) -> Option<&TaskNode> {
    for node in forest {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_by_id(&node.subtasks, id) {
            return Some(found);
        }
    }
    None
}

/// True iff every node at every depth is completed (vacuously true when empty)
pub fn are_all_complete(forest: &[TaskNode]) -> bool {
    forest
        .iter()
        .all(|node| node.completed && are_all_complete(&node.subtasks))
}

/// `(completed, total)` across all depths
pub fn completion_counts(forest: &[TaskNode]) -> (usize, usize) {
    forest.iter().fold((0, 0), |(done, total), node| {
        let (sub_done, sub_total) = completion_counts(&node.subtasks);
        (
            done + usize::from(node.completed) + sub_done,
            total + 1 + sub_total,
        )
    })
}

/// `"completed/total"`, `"0/0"` for an empty forest
pub fn completion_ratio(forest: &[TaskNode]) -> String {
    let (done, total) = completion_counts(forest);
    format!("{}/{}", done, total)
}

/// Number of nodes at all depths
pub fn count_nodes(forest: &[TaskNode]) -> usize {
    forest.iter().map(|node| 1 + count_nodes(&node.subtasks)).sum()
}

/// Append `task` at top level (`parent = None`) or to the parent's subtasks
pub fn append_task(forest: &[TaskNode], parent: Option<TaskId>, task: TaskNode) -> (Vec<TaskNode>, bool) {
    match parent {
        None => {
            let mut updated = forest.to_vec();
            updated.push(task);
            (updated, true)
        }
        Some(parent_id) => find_and_update(forest, parent_id, move |node| {
            let mut node = node.clone();
            node.subtasks.push(task);
            node
        }),
    }
}

/// Standard array move: remove at `from`, reinsert at `to`
pub fn move_sibling(siblings: &[TaskNode], from: usize, to: usize) -> TaskResult<Vec<TaskNode>> {
    let len = siblings.len();
    if from >= len || to >= len {
        return Err(TaskError::Validation(format!(
            "cannot move position {} to {} in a group of {}",
            from, to, len
        )));
    }

    let mut moved = siblings.to_vec();
    let node = moved.remove(from);
    moved.insert(to, node);
    Ok(moved)
}

/// Move a sibling within the group owned by `parent` (top level when `None`).
///
/// Returns `false` when the parent id does not exist.
pub fn reorder_in(
    forest: &[TaskNode],
    parent: Option<TaskId>,
    from: usize,
    to: usize,
) -> TaskResult<(Vec<TaskNode>, bool)> {
    match parent {
        None => Ok((move_sibling(forest, from, to)?, true)),
        Some(parent_id) => {
            let Some(parent_node) = find_by_id(forest, parent_id) else {
                return Ok((forest.to_vec(), false));
            };
            let moved = move_sibling(&parent_node.subtasks, from, to)?;
            Ok(find_and_update(forest, parent_id, move |node| TaskNode {
                subtasks: moved,
                ..node.clone()
            }))
        }
    }
}

/// Check name bounds and id uniqueness across the whole tree
pub fn validate_forest(forest: &[TaskNode], max_name_len: usize) -> TaskResult<()> {
    fn walk(forest: &[TaskNode], max_name_len: usize, seen: &mut HashSet<TaskId>) -> TaskResult<()> {
        for node in forest {
            TaskNode::validate_name(&node.name, max_name_len)?;
            if !seen.insert(node.id) {
                return Err(TaskError::Validation(format!("duplicate task id {}", node.id)));
            }
            walk(&node.subtasks, max_name_len, seen)?;
        }
        Ok(())
    }

    walk(forest, max_name_len, &mut HashSet::new())
}

/// Give a fresh id to every node whose id was already seen earlier in the tree.
///
/// Returns the normalised forest and how many ids were reassigned.
pub fn dedupe_ids(forest: &[TaskNode]) -> (Vec<TaskNode>, usize) {
    fn walk(forest: &[TaskNode], seen: &mut HashSet<TaskId>, reassigned: &mut usize) -> Vec<TaskNode> {
        forest
            .iter()
            .map(|node| {
                let mut id = node.id;
                if !seen.insert(id) {
                    id = TaskId::new();
                    seen.insert(id);
                    *reassigned += 1;
                }
                TaskNode {
                    id,
                    name: node.name.clone(),
                    completed: node.completed,
                    priority: node.priority,
                    subtasks: walk(&node.subtasks, seen, reassigned),
                }
            })
            .collect()
    }

    let mut reassigned = 0;
    let forest = walk(forest, &mut HashSet::new(), &mut reassigned);
    (forest, reassigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;

    fn task(name: &str) -> TaskNode {
        TaskNode::new(name)
    }

    fn done(name: &str) -> TaskNode {
        TaskNode {
            completed: true,
            ..TaskNode::new(name)
        }
    }

    /// a(a1(a1x), a2), b
    fn sample() -> Vec<TaskNode> {
        vec![
            task("a").with_subtasks(vec![
                task("a1").with_subtasks(vec![task("a1x")]),
                done("a2"),
            ]),
            task("b"),
        ]
    }

    fn all_ids(forest: &[TaskNode]) -> Vec<TaskId> {
        forest
            .iter()
            .flat_map(|n| std::iter::once(n.id).chain(all_ids(&n.subtasks)))
            .collect()
    }

    #[test]
    fn test_find_and_update_changes_only_target() {
        let forest = sample();
        let target = forest[0].subtasks[0].subtasks[0].id;

        let (updated, found) = find_and_update(&forest, target, |n| TaskNode {
            completed: true,
            ..n.clone()
        });

        assert!(found);
        assert!(updated[0].subtasks[0].subtasks[0].completed);
        // Everything else is untouched
        let mut expected = forest.clone();
        expected[0].subtasks[0].subtasks[0].completed = true;
        assert_eq!(updated, expected);
    }

    #[test]
    fn test_find_and_update_every_node() {
        let forest = sample();
        for id in all_ids(&forest) {
            let (updated, found) = find_and_update(&forest, id, |n| TaskNode {
                name: format!("{}!", n.name),
                ..n.clone()
            });
            assert!(found);
            let changed: Vec<_> = all_ids(&updated)
                .into_iter()
                .filter(|i| find_by_id(&updated, *i).unwrap().name.ends_with('!'))
                .collect();
            assert_eq!(changed, vec![id]);
        }
    }

    #[test]
    fn test_find_and_update_absent_id() {
        let forest = sample();
        let (updated, found) = find_and_update(&forest, TaskId::new(), |_| task("never"));
        assert!(!found);
        assert_eq!(updated, forest);
    }

    #[test]
    fn test_find_and_delete_removes_subtree() {
        let forest = sample();
        for id in all_ids(&forest) {
            let removed_expected = 1 + count_nodes(&find_by_id(&forest, id).unwrap().subtasks);
            let (updated, found) = find_and_delete(&forest, id);
            assert!(found);
            assert!(find_by_id(&updated, id).is_none());
            assert_eq!(count_nodes(&forest) - count_nodes(&updated), removed_expected);
        }
    }

    #[test]
    fn test_find_and_delete_absent_id() {
        let forest = sample();
        let (updated, found) = find_and_delete(&forest, TaskId::new());
        assert!(!found);
        assert_eq!(updated, forest);
    }

    #[test]
    fn test_delete_parent_with_mixed_subtasks() {
        let s1 = task("s1");
        let s2 = done("s2");
        let (s1_id, s2_id) = (s1.id, s2.id);
        let t1 = task("t1").with_subtasks(vec![s1, s2]);
        let t1_id = t1.id;

        let (updated, found) = find_and_delete(&[t1], t1_id);

        assert!(found);
        assert!(updated.is_empty());
        for id in [t1_id, s1_id, s2_id] {
            assert!(find_by_id(&updated, id).is_none());
        }
    }

    #[test]
    fn test_are_all_complete() {
        assert!(are_all_complete(&[]));
        assert!(!are_all_complete(&sample()));
        // A completed parent with an incomplete child is not complete
        let nested = vec![done("p").with_subtasks(vec![task("c")])];
        assert!(!are_all_complete(&nested));
        let nested = vec![done("p").with_subtasks(vec![done("c")])];
        assert!(are_all_complete(&nested));
    }

    #[test]
    fn test_completion_ratio() {
        assert_eq!(completion_ratio(&[]), "0/0");
        assert_eq!(completion_ratio(&sample()), "1/5");
        let (done_count, total) = completion_counts(&sample());
        assert!(done_count <= total);
    }

    #[test]
    fn test_append_task() {
        let forest = sample();
        let parent = forest[1].id;
        let child = task("b1");
        let child_id = child.id;

        let (updated, found) = append_task(&forest, Some(parent), child);
        assert!(found);
        assert_eq!(updated[1].subtasks[0].id, child_id);

        let (updated, found) = append_task(&forest, Some(TaskId::new()), task("lost"));
        assert!(!found);
        assert_eq!(updated, forest);

        let (updated, _) = append_task(&forest, None, task("c"));
        assert_eq!(updated.last().unwrap().name, "c");
    }

    #[test]
    fn test_move_sibling() {
        let group = vec![task("0"), task("1"), task("2"), task("3")];
        let names = |v: &[TaskNode]| v.iter().map(|n| n.name.clone()).collect::<Vec<_>>();

        assert_eq!(names(&move_sibling(&group, 0, 2).unwrap()), ["1", "2", "0", "3"]);
        assert_eq!(names(&move_sibling(&group, 3, 0).unwrap()), ["3", "0", "1", "2"]);
        assert_eq!(names(&move_sibling(&group, 1, 1).unwrap()), ["0", "1", "2", "3"]);
        assert!(move_sibling(&group, 4, 0).is_err());
        assert!(move_sibling(&group, 0, 4).is_err());
    }

    #[test]
    fn test_reorder_in_nested_group() {
        let forest = vec![task("p").with_subtasks(vec![task("x"), task("y"), task("z")]), task("q")];
        let parent = forest[0].id;

        let (updated, found) = reorder_in(&forest, Some(parent), 2, 0).unwrap();
        assert!(found);
        let names: Vec<_> = updated[0].subtasks.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["z", "x", "y"]);
        assert_eq!(updated[1], forest[1]);

        let (top, _) = reorder_in(&forest, None, 0, 1).unwrap();
        assert_eq!(top[0].name, "q");

        let (same, found) = reorder_in(&forest, Some(TaskId::new()), 0, 1).unwrap();
        assert!(!found);
        assert_eq!(same, forest);
    }

    #[test]
    fn test_validate_forest() {
        assert!(validate_forest(&sample(), 200).is_ok());

        let dup = task("dup");
        let forest = vec![dup.clone(), task("other").with_subtasks(vec![dup])];
        assert!(matches!(validate_forest(&forest, 200), Err(TaskError::Validation(_))));

        let blank = vec![TaskNode { name: "  ".into(), ..task("x") }];
        assert!(validate_forest(&blank, 200).is_err());
    }

    #[test]
    fn test_dedupe_ids() {
        let dup = task("dup").with_priority(Priority::High);
        let forest = vec![dup.clone(), task("other").with_subtasks(vec![dup.clone()])];

        let (normalised, reassigned) = dedupe_ids(&forest);
        assert_eq!(reassigned, 1);
        assert_eq!(normalised[0].id, dup.id);
        assert_ne!(normalised[1].subtasks[0].id, dup.id);
        assert_eq!(normalised[1].subtasks[0].priority, Priority::High);
        assert!(validate_forest(&normalised, 200).is_ok());
    }
}
