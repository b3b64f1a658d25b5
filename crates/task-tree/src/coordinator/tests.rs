//! Coordinator tests against an in-memory persistence port.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{MutationCoordinator, NoticeLevel, StoreEvent};
use crate::config::TaskTreeConfig;
use crate::domain::{ListId, Priority, TaskError, TaskId, TaskList, TaskNode};
use crate::ports::{ListPersistence, PortError};
use crate::store::ListStore;
use crate::tree::{completion_ratio, find_by_id};

/// Stores lists in memory. Writes wait on queued gates when present
/// (`true` = succeed), otherwise follow `fail_writes`.
#[derive(Default)]
struct MemoryPersistence {
    lists: RefCell<Vec<TaskList>>,
    writes: RefCell<Vec<(ListId, Vec<TaskNode>)>>,
    gates: RefCell<VecDeque<oneshot::Receiver<bool>>>,
    fail_writes: Cell<bool>,
    fetches: Cell<usize>,
    created: Cell<usize>,
}

impl MemoryPersistence {
    fn gate(&self) -> oneshot::Sender<bool> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push_back(rx);
        tx
    }

    async fn outcome(&self) -> Result<(), PortError> {
        let gate = self.gates.borrow_mut().pop_front();
        let succeed = match gate {
            Some(rx) => rx.await.unwrap_or(false),
            None => !self.fail_writes.get(),
        };
        if succeed {
            Ok(())
        } else {
            Err(PortError::new("storage unavailable"))
        }
    }
}

#[async_trait(?Send)]
impl ListPersistence for MemoryPersistence {
    async fn fetch_lists(&self, _user_id: &str) -> Result<Vec<TaskList>, PortError> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.lists.borrow().clone())
    }

    async fn create_list(&self, name: &str) -> Result<ListId, PortError> {
        self.outcome().await?;
        self.created.set(self.created.get() + 1);
        let id = ListId::new(format!("list-{}", self.created.get()));
        self.lists.borrow_mut().push(TaskList::new(id.clone(), name));
        Ok(id)
    }

    async fn replace_list_tasks(&self, list_id: &ListId, tasks: &[TaskNode]) -> Result<(), PortError> {
        self.outcome().await?;
        self.writes.borrow_mut().push((list_id.clone(), tasks.to_vec()));
        if let Some(list) = self.lists.borrow_mut().iter_mut().find(|l| &l.id == list_id) {
            list.tasks = tasks.to_vec();
        }
        Ok(())
    }

    async fn rename_list(&self, list_id: &ListId, name: &str) -> Result<(), PortError> {
        self.outcome().await?;
        if let Some(list) = self.lists.borrow_mut().iter_mut().find(|l| &l.id == list_id) {
            list.name = name.to_string();
        }
        Ok(())
    }

    async fn delete_list(&self, list_id: &ListId) -> Result<(), PortError> {
        self.outcome().await?;
        self.lists.borrow_mut().retain(|l| &l.id != list_id);
        Ok(())
    }
}

struct Harness {
    coordinator: MutationCoordinator,
    port: Rc<MemoryPersistence>,
    events: Rc<RefCell<Vec<StoreEvent>>>,
}

impl Harness {
    fn with_config(lists: Vec<TaskList>, config: TaskTreeConfig) -> Self {
        let port = Rc::new(MemoryPersistence::default());
        *port.lists.borrow_mut() = lists.clone();
        let dyn_port: Rc<dyn ListPersistence> = port.clone();
        let coordinator = MutationCoordinator::new(ListStore::authenticated("user-1", lists), dyn_port, config);

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        coordinator.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        Self { coordinator, port, events }
    }

    fn new(lists: Vec<TaskList>) -> Self {
        Self::with_config(lists, TaskTreeConfig::default())
    }

    fn tasks(&self, id: &ListId) -> Vec<TaskNode> {
        self.coordinator.list(id).map(|l| l.tasks).unwrap_or_default()
    }

    fn error_notices(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, StoreEvent::Notice(n) if n.level == NoticeLevel::Error))
            .count()
    }
}

fn inbox() -> ListId {
    ListId::new("inbox")
}

fn empty_inbox() -> Vec<TaskList> {
    vec![TaskList::new(inbox(), "Inbox")]
}

#[tokio::test]
async fn test_add_task_to_empty_list() {
    let h = Harness::new(empty_inbox());

    let id = h.coordinator.add_task(&inbox(), "Write report", None).await.unwrap();

    let tasks = h.tasks(&inbox());
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, id);
    assert!(!tasks[0].completed);
    assert_eq!(tasks[0].priority, Priority::None);
    assert_eq!(completion_ratio(&tasks), "0/1");
    assert_eq!(h.port.writes.borrow().len(), 1);
    assert!(h.coordinator.with_store(|s| s.is_fresh(&inbox())));
}

#[tokio::test]
async fn test_add_subtask_under_parent() {
    let parent = TaskNode::new("Trip");
    let parent_id = parent.id;
    let h = Harness::new(vec![TaskList::new(inbox(), "Inbox").with_tasks(vec![parent])]);

    let child = h.coordinator.add_task(&inbox(), "Book hotel", Some(parent_id)).await.unwrap();

    let tasks = h.tasks(&inbox());
    assert_eq!(tasks[0].subtasks[0].id, child);
}

#[tokio::test]
async fn test_add_task_rejects_blank_name_without_writing() {
    let h = Harness::new(empty_inbox());

    let result = h.coordinator.add_task(&inbox(), "   ", None).await;

    assert!(matches!(result, Err(TaskError::Validation(_))));
    assert!(h.port.writes.borrow().is_empty());
    assert_eq!(h.error_notices(), 1);
}

#[tokio::test]
async fn test_add_task_under_missing_parent() {
    let h = Harness::new(empty_inbox());

    let result = h.coordinator.add_task(&inbox(), "Orphan", Some(TaskId::new())).await;

    assert!(matches!(result, Err(TaskError::InvalidTarget(_))));
    assert!(h.tasks(&inbox()).is_empty());
    assert!(h.port.writes.borrow().is_empty());
}

#[tokio::test]
async fn test_placeholder_lists_are_never_written() {
    let port = Rc::new(MemoryPersistence::default());
    let dyn_port: Rc<dyn ListPersistence> = port.clone();
    let coordinator = MutationCoordinator::new(ListStore::preview(), dyn_port, TaskTreeConfig::default());
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    coordinator.subscribe(move |e| sink.borrow_mut().push(e.clone()));

    let preview = coordinator.lists()[0].clone();
    let before = preview.tasks.clone();
    assert!(!coordinator.is_stale(&preview.id));

    let result = coordinator.add_task(&preview.id, "Mine now", None).await;
    assert!(matches!(result, Err(TaskError::InvalidTarget(_))));
    let result = coordinator.toggle_completion(&preview.id, before[0].id).await;
    assert!(matches!(result, Err(TaskError::InvalidTarget(_))));
    let result = coordinator.create_list("New").await;
    assert!(matches!(result, Err(TaskError::InvalidTarget(_))));

    assert_eq!(coordinator.list(&preview.id).unwrap().tasks, before);
    assert!(port.writes.borrow().is_empty());
    assert!(events.borrow().contains(&StoreEvent::SignInRequired));
}

#[tokio::test]
async fn test_unknown_list_is_invalid_target() {
    let h = Harness::new(empty_inbox());

    let result = h.coordinator.apply(&ListId::new("nope"), vec![TaskNode::new("x")]).await;

    assert!(matches!(result, Err(TaskError::InvalidTarget(_))));
    assert!(h.port.writes.borrow().is_empty());
}

#[tokio::test]
async fn test_failed_write_rolls_back() {
    let task = TaskNode::new("Pay rent");
    let task_id = task.id;
    let h = Harness::new(vec![TaskList::new(inbox(), "Inbox").with_tasks(vec![task])]);
    let before = h.tasks(&inbox());
    h.port.fail_writes.set(true);

    let result = h.coordinator.toggle_completion(&inbox(), task_id).await;

    assert!(matches!(result, Err(TaskError::Persistence(_))));
    assert_eq!(h.tasks(&inbox()), before);
    assert!(!h.coordinator.is_pending(&inbox()));
    assert_eq!(h.error_notices(), 1);
    // No completion signal for a rolled back toggle
    assert!(!h
        .events
        .borrow()
        .iter()
        .any(|e| matches!(e, StoreEvent::TaskCompleted { .. })));

    // The list stays usable
    h.port.fail_writes.set(false);
    assert!(h.coordinator.toggle_completion(&inbox(), task_id).await.unwrap());
    assert!(h.tasks(&inbox())[0].completed);
}

#[tokio::test]
async fn test_optimistic_state_is_visible_before_commit() {
    let task = TaskNode::new("Call mom");
    let task_id = task.id;
    let h = Harness::new(vec![TaskList::new(inbox(), "Inbox").with_tasks(vec![task])]);
    let gate = h.port.gate();
    let list_id = inbox();

    let (result, ()) = tokio::join!(h.coordinator.toggle_completion(&list_id, task_id), async {
        assert!(h.tasks(&inbox())[0].completed);
        assert!(h.coordinator.is_pending(&inbox()));
        assert!(h.coordinator.is_stale(&inbox()));
        assert!(h.events.borrow().contains(&StoreEvent::ListsChanged));
        gate.send(true).unwrap();
    });

    assert!(result.unwrap());
    assert!(h.tasks(&inbox())[0].completed);
    assert!(!h.coordinator.is_pending(&inbox()));
    assert!(!h.coordinator.is_stale(&inbox()));
}

#[tokio::test]
async fn test_rollback_uses_own_snapshot_when_interleaved() {
    let h = Harness::new(empty_inbox());
    let first_gate = h.port.gate();
    let second_gate = h.port.gate();
    let list_id = inbox();

    let (first, second, ()) = tokio::join!(
        h.coordinator.add_task(&list_id, "A", None),
        h.coordinator.add_task(&list_id, "B", None),
        async {
            let names: Vec<_> = h.tasks(&inbox()).into_iter().map(|t| t.name).collect();
            assert_eq!(names, ["A", "B"]);
            first_gate.send(true).unwrap();
            second_gate.send(false).unwrap();
        }
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(TaskError::Persistence(_))));
    // Back to the state right before B was applied, not the original empty list
    let names: Vec<_> = h.tasks(&inbox()).into_iter().map(|t| t.name).collect();
    assert_eq!(names, ["A"]);
    assert_eq!(h.tasks(&inbox()), h.port.lists.borrow()[0].tasks);
    assert!(h.coordinator.with_store(|s| s.is_fresh(&inbox())));
}

fn stored_names(h: &Harness) -> Vec<String> {
    h.port.lists.borrow()[0].tasks.iter().map(|t| t.name.clone()).collect()
}

#[tokio::test]
async fn test_later_commit_supersedes_earlier_failure() {
    let h = Harness::new(empty_inbox());
    let first_gate = h.port.gate();
    let second_gate = h.port.gate();
    let list_id = inbox();

    let (first, second, ()) = tokio::join!(
        h.coordinator.add_task(&list_id, "A", None),
        h.coordinator.add_task(&list_id, "B", None),
        async {
            first_gate.send(false).unwrap();
            // Let A fail while B is still outstanding
            while h.error_notices() == 0 {
                tokio::task::yield_now().await;
            }
            let names: Vec<_> = h.tasks(&inbox()).into_iter().map(|t| t.name).collect();
            assert_eq!(names, ["A", "B"]);
            second_gate.send(true).unwrap();
        }
    );

    assert!(matches!(first, Err(TaskError::Persistence(_))));
    assert!(second.is_ok());
    assert_eq!(stored_names(&h), ["A", "B"]);
    assert_eq!(h.tasks(&inbox()), h.port.lists.borrow()[0].tasks);
    assert!(h.coordinator.with_store(|s| s.is_fresh(&inbox())));
    assert!(!h.coordinator.is_pending(&inbox()));
}

#[tokio::test]
async fn test_interleaved_failures_return_to_stored_forest() {
    let h = Harness::new(empty_inbox());
    let first_gate = h.port.gate();
    let second_gate = h.port.gate();
    let list_id = inbox();

    let (first, second, ()) = tokio::join!(
        h.coordinator.add_task(&list_id, "A", None),
        h.coordinator.add_task(&list_id, "B", None),
        async {
            first_gate.send(false).unwrap();
            second_gate.send(false).unwrap();
        }
    );

    assert!(first.is_err());
    assert!(second.is_err());
    assert!(h.tasks(&inbox()).is_empty());
    assert!(stored_names(&h).is_empty());
    assert!(h.coordinator.with_store(|s| s.is_fresh(&inbox())));
}

#[tokio::test]
async fn test_unreadable_list_is_never_written() {
    let mut damaged = TaskList::new(inbox(), "Inbox");
    damaged.unreadable = true;
    let h = Harness::new(vec![damaged]);

    let result = h.coordinator.add_task(&inbox(), "Overwrite", None).await;

    assert!(matches!(result, Err(TaskError::InvalidTarget(_))));
    assert!(h.port.writes.borrow().is_empty());
    assert_eq!(h.error_notices(), 1);
    // Renaming is still allowed
    h.coordinator.rename_list(&inbox(), "Inbox (damaged)").await.unwrap();
}

#[tokio::test]
async fn test_completion_signals() {
    let mut done = TaskNode::new("done");
    done.completed = true;
    let open = TaskNode::new("open");
    let open_id = open.id;
    let h = Harness::new(vec![TaskList::new(inbox(), "Inbox").with_tasks(vec![done, open])]);

    h.coordinator.toggle_completion(&inbox(), open_id).await.unwrap();
    {
        let events = h.events.borrow();
        assert!(events.contains(&StoreEvent::TaskCompleted { list_id: inbox(), task_id: open_id }));
        assert!(events.contains(&StoreEvent::ListCompleted { list_id: inbox() }));
    }

    h.events.borrow_mut().clear();
    h.coordinator.toggle_completion(&inbox(), open_id).await.unwrap();
    assert!(!h.events.borrow().iter().any(|e| matches!(
        e,
        StoreEvent::TaskCompleted { .. } | StoreEvent::ListCompleted { .. }
    )));
}

#[tokio::test]
async fn test_toggle_unknown_task_writes_nothing() {
    let h = Harness::new(empty_inbox());
    assert!(!h.coordinator.toggle_completion(&inbox(), TaskId::new()).await.unwrap());
    assert!(!h.coordinator.delete_task(&inbox(), TaskId::new()).await.unwrap());
    assert!(h.port.writes.borrow().is_empty());
}

#[tokio::test]
async fn test_set_priority_validates_level() {
    let task = TaskNode::new("Taxes");
    let task_id = task.id;
    let h = Harness::new(vec![TaskList::new(inbox(), "Inbox").with_tasks(vec![task])]);

    let result = h.coordinator.set_priority(&inbox(), task_id, 4).await;
    assert!(matches!(result, Err(TaskError::Validation(_))));
    assert!(h.port.writes.borrow().is_empty());

    assert!(h.coordinator.set_priority(&inbox(), task_id, 3).await.unwrap());
    assert_eq!(h.tasks(&inbox())[0].priority, Priority::High);
}

#[tokio::test]
async fn test_rename_task() {
    let task = TaskNode::new("Draft");
    let task_id = task.id;
    let h = Harness::new(vec![TaskList::new(inbox(), "Inbox").with_tasks(vec![task])]);

    assert!(h.coordinator.rename_task(&inbox(), task_id, "  Final  ").await.unwrap());
    assert_eq!(h.tasks(&inbox())[0].name, "Final");
    assert!(h.coordinator.rename_task(&inbox(), task_id, "").await.is_err());
}

#[tokio::test]
async fn test_delete_task_cascades() {
    let s1 = TaskNode::new("s1");
    let mut s2 = TaskNode::new("s2");
    s2.completed = true;
    let (s1_id, s2_id) = (s1.id, s2.id);
    let t1 = TaskNode::new("t1").with_subtasks(vec![s1, s2]);
    let t1_id = t1.id;
    let h = Harness::new(vec![TaskList::new(inbox(), "Inbox").with_tasks(vec![t1])]);

    assert!(h.coordinator.delete_task(&inbox(), t1_id).await.unwrap());

    let tasks = h.tasks(&inbox());
    assert!(tasks.is_empty());
    for id in [t1_id, s1_id, s2_id] {
        assert!(find_by_id(&tasks, id).is_none());
    }
    assert!(h.port.lists.borrow()[0].tasks.is_empty());
}

#[tokio::test]
async fn test_reorder_subtasks() {
    let parent = TaskNode::new("p").with_subtasks(vec![
        TaskNode::new("x"),
        TaskNode::new("y"),
        TaskNode::new("z"),
    ]);
    let parent_id = parent.id;
    let h = Harness::new(vec![TaskList::new(inbox(), "Inbox").with_tasks(vec![parent])]);

    assert!(h.coordinator.reorder(&inbox(), Some(parent_id), 0, 2).await.unwrap());
    let names: Vec<_> = h.tasks(&inbox())[0].subtasks.iter().map(|t| t.name.clone()).collect();
    assert_eq!(names, ["y", "z", "x"]);

    // Same index is a no-op
    let writes = h.port.writes.borrow().len();
    assert!(!h.coordinator.reorder(&inbox(), Some(parent_id), 1, 1).await.unwrap());
    assert_eq!(h.port.writes.borrow().len(), writes);

    let result = h.coordinator.reorder(&inbox(), Some(parent_id), 0, 9).await;
    assert!(matches!(result, Err(TaskError::Validation(_))));
}

#[tokio::test]
async fn test_create_list_swaps_pending_id() {
    let h = Harness::new(vec![]);
    let gate = h.port.gate();

    let (created, ()) = tokio::join!(h.coordinator.create_list("Work"), async {
        let lists = h.coordinator.lists();
        assert_eq!(lists.len(), 1);
        assert!(!lists[0].id.is_persisted());
        // Not editable until storage has answered
        assert!(h.coordinator.add_task(&lists[0].id, "Early", None).await.is_err());
        gate.send(true).unwrap();
    });

    let id = created.unwrap();
    let lists = h.coordinator.lists();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].id, id);
    assert_eq!(lists[0].name, "Work");
}

#[tokio::test]
async fn test_create_list_failure_removes_it() {
    let h = Harness::new(vec![]);
    h.port.fail_writes.set(true);

    assert!(matches!(h.coordinator.create_list("Work").await, Err(TaskError::Persistence(_))));
    assert!(h.coordinator.lists().is_empty());
}

#[tokio::test]
async fn test_delete_list_failure_reinserts_at_same_position() {
    let lists = vec![
        TaskList::new(ListId::new("a"), "A"),
        TaskList::new(ListId::new("b"), "B"),
        TaskList::new(ListId::new("c"), "C"),
    ];
    let h = Harness::new(lists.clone());
    h.port.fail_writes.set(true);

    assert!(h.coordinator.delete_list(&ListId::new("b")).await.is_err());
    assert_eq!(h.coordinator.lists(), lists);
    assert!(!h.coordinator.is_stale(&ListId::new("b")));

    h.port.fail_writes.set(false);
    h.coordinator.delete_list(&ListId::new("b")).await.unwrap();
    let ids: Vec<_> = h.coordinator.lists().into_iter().map(|l| l.id).collect();
    assert_eq!(ids, [ListId::new("a"), ListId::new("c")]);
}

#[tokio::test]
async fn test_rename_list_failure_restores_name() {
    let h = Harness::new(empty_inbox());
    h.port.fail_writes.set(true);

    assert!(h.coordinator.rename_list(&inbox(), "Renamed").await.is_err());
    assert_eq!(h.coordinator.list(&inbox()).unwrap().name, "Inbox");

    h.port.fail_writes.set(false);
    h.coordinator.rename_list(&inbox(), "Renamed").await.unwrap();
    assert_eq!(h.coordinator.list(&inbox()).unwrap().name, "Renamed");
}

#[tokio::test]
async fn test_load_session_modes() {
    let h = Harness::new(empty_inbox());

    h.coordinator.load_session(None).await.unwrap();
    assert!(!h.coordinator.is_authenticated());
    assert!(h.coordinator.lists().iter().all(|l| l.id.is_placeholder()));

    h.coordinator.load_session(Some("user-1")).await.unwrap();
    assert!(h.coordinator.is_authenticated());
    assert_eq!(h.coordinator.lists(), empty_inbox());
    assert_eq!(h.port.fetches.get(), 1);
}

#[tokio::test]
async fn test_refetch_after_commit() {
    let config = TaskTreeConfig {
        refetch_after_commit: true,
        ..TaskTreeConfig::default()
    };
    let h = Harness::with_config(empty_inbox(), config);

    h.coordinator.add_task(&inbox(), "Synced", None).await.unwrap();

    assert_eq!(h.port.fetches.get(), 1);
    assert_eq!(h.tasks(&inbox())[0].name, "Synced");
}
