//! Mutation Coordinator
//!
//! The only writer to persistent storage. Every edit goes through the same
//! protocol: snapshot the list, apply the new forest in memory and notify
//! listeners, then issue the whole-tree replace and roll back to this
//! mutation's own snapshot if it fails.
//!
//! Single-threaded: state lives in `Rc<RefCell<_>>` and no borrow is held
//! across an await or while listeners run.

mod events;

#[cfg(test)]
mod tests;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info, warn};

use crate::config::TaskTreeConfig;
use crate::domain::{ListId, ListKind, Priority, TaskError, TaskId, TaskList, TaskNode, TaskResult};
use crate::ports::ListPersistence;
use crate::store::ListStore;
use crate::tree::{
    append_task, are_all_complete, find_and_delete, find_and_update, find_by_id, reorder_in,
};

pub use events::{Notice, NoticeLevel, StoreEvent};

type Listener = Rc<dyn Fn(&StoreEvent)>;

/// Writes outstanding for one list
struct Flight {
    newest: u64,
    outstanding: usize,
    /// Forest storage holds as far as resolved writes tell
    confirmed: Vec<TaskNode>,
}

/// How a write's completion left its list
struct Landing {
    /// No later write for the list was issued meanwhile
    newest: bool,
    /// Set once the last outstanding write resolved
    settled: Option<Vec<TaskNode>>,
}

/// Cheap to clone; all clones share one store
#[derive(Clone)]
pub struct MutationCoordinator {
    store: Rc<RefCell<ListStore>>,
    persistence: Rc<dyn ListPersistence>,
    listeners: Rc<RefCell<Vec<Listener>>>,
    in_flight: Rc<RefCell<HashMap<ListId, Flight>>>,
    sequence: Rc<Cell<u64>>,
    config: Rc<TaskTreeConfig>,
}

impl MutationCoordinator {
    pub fn new(store: ListStore, persistence: Rc<dyn ListPersistence>, config: TaskTreeConfig) -> Self {
        Self {
            store: Rc::new(RefCell::new(store)),
            persistence,
            listeners: Rc::new(RefCell::new(Vec::new())),
            in_flight: Rc::new(RefCell::new(HashMap::new())),
            sequence: Rc::new(Cell::new(0)),
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &TaskTreeConfig {
        &self.config
    }

    /// Register a listener; it is called synchronously for every event
    pub fn subscribe(&self, listener: impl Fn(&StoreEvent) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Read the store without cloning it
    pub fn with_store<R>(&self, read: impl FnOnce(&ListStore) -> R) -> R {
        read(&self.store.borrow())
    }

    pub fn lists(&self) -> Vec<TaskList> {
        self.store.borrow().lists().to_vec()
    }

    pub fn list(&self, id: &ListId) -> Option<TaskList> {
        self.store.borrow().get(id).cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.borrow().is_authenticated()
    }

    /// Whether a write for this list is awaiting storage
    pub fn is_pending(&self, id: &ListId) -> bool {
        self.in_flight.borrow().contains_key(id)
    }

    /// Whether the list shown may differ from what storage holds: a write is
    /// outstanding or the list has not been created yet
    pub fn is_stale(&self, id: &ListId) -> bool {
        id.kind() != ListKind::Placeholder && !self.store.borrow().is_fresh(id)
    }

    // ========================
    // Session
    // ========================

    /// Populate the store for a session: fetch once when signed in, or show
    /// the preview lists when signed out.
    pub async fn load_session(&self, user_id: Option<&str>) -> TaskResult<()> {
        let Some(user_id) = user_id else {
            let preview = if self.config.preview_lists {
                ListStore::preview()
            } else {
                ListStore::preview_with(Vec::new())
            };
            *self.store.borrow_mut() = preview;
            self.emit(StoreEvent::ListsChanged);
            return Ok(());
        };

        let fetched = self.persistence.fetch_lists(user_id).await;
        match fetched {
            Ok(lists) => {
                info!("Loaded {} task lists for {}", lists.len(), user_id);
                *self.store.borrow_mut() = ListStore::authenticated(user_id, lists);
                self.emit(StoreEvent::ListsChanged);
                Ok(())
            }
            Err(e) => {
                warn!("Fetching lists for {} failed: {}", user_id, e);
                *self.store.borrow_mut() = ListStore::authenticated(user_id, Vec::new());
                self.emit(StoreEvent::ListsChanged);
                Err(self.reject(None, TaskError::Persistence(e.to_string())))
            }
        }
    }

    /// Re-fetch every list of the signed-in user
    pub async fn refresh(&self) -> TaskResult<()> {
        let user_id = self.store.borrow().user_id().map(str::to_string);
        let Some(user_id) = user_id else {
            return Ok(());
        };

        let lists = self
            .persistence
            .fetch_lists(&user_id)
            .await
            .map_err(|e| self.reject(None, TaskError::Persistence(e.to_string())))?;
        self.store.borrow_mut().replace_all(lists);
        self.emit(StoreEvent::ListsChanged);
        Ok(())
    }

    // ========================
    // Core protocol
    // ========================

    /// Optimistically replace a list's forest and persist it.
    ///
    /// On failure the list is restored to what it held before this call's own
    /// apply, unless a later write for the list is already in flight. Once the
    /// last outstanding write resolves, the list is set to the forest storage
    /// holds, so memory and storage never stay apart.
    pub async fn apply(&self, list_id: &ListId, new_forest: Vec<TaskNode>) -> TaskResult<()> {
        let snapshot = {
            let mut store = self.store.borrow_mut();
            let taken = store
                .mutable_tasks(list_id)
                .map(|tasks| std::mem::replace(tasks, new_forest.clone()));
            if taken.is_ok() {
                store.invalidate(list_id);
            }
            taken
        };
        let snapshot = snapshot.map_err(|e| self.reject(Some(list_id), e))?;
        let flight = self.begin_flight(list_id, &snapshot);
        self.emit(StoreEvent::ListsChanged);

        debug!("Persisting {} top-level tasks for list {}", new_forest.len(), list_id);
        let result = self.persistence.replace_list_tasks(list_id, &new_forest).await;

        match result {
            Ok(()) => {
                let landing = self.end_flight(list_id, flight, Some(new_forest));
                if let Some(confirmed) = landing.settled {
                    self.settle(list_id, confirmed);
                }
                self.emit(StoreEvent::ListsChanged);
                self.reconcile().await;
                Ok(())
            }
            Err(e) => {
                let landing = self.end_flight(list_id, flight, None);
                if landing.newest {
                    warn!("Write for list {} failed, rolling back: {}", list_id, e);
                    self.store
                        .borrow_mut()
                        .update(list_id, |list| list.tasks = snapshot);
                } else {
                    warn!("Write for list {} failed, a later write supersedes it: {}", list_id, e);
                }
                if let Some(confirmed) = landing.settled {
                    self.settle(list_id, confirmed);
                }
                self.emit(StoreEvent::ListsChanged);
                Err(self.reject(Some(list_id), TaskError::Persistence(e.to_string())))
            }
        }
    }

    /// Compute a new forest from the current one and apply it.
    ///
    /// `Ok(false)` means the target was not found and nothing was written.
    async fn mutate<F>(&self, list_id: &ListId, compute: F) -> TaskResult<bool>
    where
        F: FnOnce(&[TaskNode]) -> TaskResult<(Vec<TaskNode>, bool)>,
    {
        let current = self.editable_tasks(list_id)?;
        let (forest, found) = compute(current.as_slice()).map_err(|e| self.reject(Some(list_id), e))?;
        if !found {
            debug!("Nothing to change in list {}", list_id);
            return Ok(false);
        }
        self.apply(list_id, forest).await?;
        Ok(true)
    }

    // ========================
    // Task operations
    // ========================

    /// Flip a task's completion. Emits `TaskCompleted` (and `ListCompleted`
    /// when every task is now done) once the write is committed.
    pub async fn toggle_completion(&self, list_id: &ListId, task_id: TaskId) -> TaskResult<bool> {
        let current = self.editable_tasks(list_id)?;
        let Some(task) = find_by_id(&current, task_id) else {
            return Ok(false);
        };
        let completing = !task.completed;

        let (forest, _) = find_and_update(&current, task_id, |node| TaskNode {
            completed: completing,
            ..node.clone()
        });
        let list_done = completing && are_all_complete(&forest);

        self.apply(list_id, forest).await?;

        if completing {
            self.emit(StoreEvent::TaskCompleted { list_id: list_id.clone(), task_id });
            if list_done {
                info!("List {} completed", list_id);
                self.emit(StoreEvent::ListCompleted { list_id: list_id.clone() });
            }
        }
        Ok(true)
    }

    /// Set a task's priority; `level` must be 0..=3
    pub async fn set_priority(&self, list_id: &ListId, task_id: TaskId, level: u8) -> TaskResult<bool> {
        let priority = Priority::try_from(level).map_err(|e| self.reject(Some(list_id), e))?;
        self.mutate(list_id, |forest| {
            Ok(find_and_update(forest, task_id, |node| TaskNode {
                priority,
                ..node.clone()
            }))
        })
        .await
    }

    pub async fn rename_task(&self, list_id: &ListId, task_id: TaskId, name: &str) -> TaskResult<bool> {
        let name = TaskNode::validate_name(name, self.config.max_name_len)
            .map_err(|e| self.reject(Some(list_id), e))?;
        self.mutate(list_id, |forest| {
            Ok(find_and_update(forest, task_id, move |node| TaskNode {
                name,
                ..node.clone()
            }))
        })
        .await
    }

    /// Delete a task and its whole subtree
    pub async fn delete_task(&self, list_id: &ListId, task_id: TaskId) -> TaskResult<bool> {
        self.mutate(list_id, |forest| Ok(find_and_delete(forest, task_id))).await
    }

    /// Append a new task at top level or under `parent_id`
    pub async fn add_task(&self, list_id: &ListId, name: &str, parent_id: Option<TaskId>) -> TaskResult<TaskId> {
        let name = TaskNode::validate_name(name, self.config.max_name_len)
            .map_err(|e| self.reject(Some(list_id), e))?;
        let task = TaskNode::new(name);
        let task_id = task.id;
        self.insert_task(list_id, parent_id, task).await?;
        Ok(task_id)
    }

    /// Append an already-built subtree in one write
    pub(crate) async fn insert_task(&self, list_id: &ListId, parent_id: Option<TaskId>, task: TaskNode) -> TaskResult<()> {
        let current = self.editable_tasks(list_id)?;
        let (forest, found) = append_task(&current, parent_id, task);
        if !found {
            let missing = parent_id.map(|id| id.to_string()).unwrap_or_default();
            return Err(self.reject(
                Some(list_id),
                TaskError::InvalidTarget(format!("parent task {} not found", missing)),
            ));
        }
        self.apply(list_id, forest).await
    }

    /// Move a sibling within one group (top level when `parent_id` is `None`)
    pub async fn reorder(
        &self,
        list_id: &ListId,
        parent_id: Option<TaskId>,
        from: usize,
        to: usize,
    ) -> TaskResult<bool> {
        self.mutate(list_id, |forest| {
            let (moved, found) = reorder_in(forest, parent_id, from, to)?;
            Ok((moved, found && from != to))
        })
        .await
    }

    // ========================
    // List operations
    // ========================

    /// Create an empty list; it shows up immediately under a pending id
    pub async fn create_list(&self, name: &str) -> TaskResult<ListId> {
        let name = TaskNode::validate_name(name, self.config.max_name_len)
            .map_err(|e| self.reject(None, e))?;
        if !self.is_authenticated() {
            self.emit(StoreEvent::SignInRequired);
            return Err(TaskError::InvalidTarget("sign in to create lists".into()));
        }

        let pending = ListId::pending(self.next_sequence());
        self.store.borrow_mut().insert(TaskList::new(pending.clone(), name.clone()));
        self.emit(StoreEvent::ListsChanged);

        let created = self.persistence.create_list(&name).await;
        match created {
            Ok(id) => {
                debug!("List {} created as {}", pending, id);
                self.store.borrow_mut().replace_id(&pending, id.clone());
                self.emit(StoreEvent::ListsChanged);
                Ok(id)
            }
            Err(e) => {
                warn!("Creating list {:?} failed: {}", name, e);
                self.store.borrow_mut().remove(&pending);
                self.emit(StoreEvent::ListsChanged);
                Err(self.reject(None, TaskError::Persistence(e.to_string())))
            }
        }
    }

    /// Remove a list; it is put back at its old position if storage refuses
    pub async fn delete_list(&self, list_id: &ListId) -> TaskResult<()> {
        let removed = {
            let mut store = self.store.borrow_mut();
            let checked = store.check_mutable(list_id);
            checked.map(|_| store.remove(list_id))
        };
        let removed = removed.map_err(|e| self.reject(Some(list_id), e))?;
        let Some((index, list)) = removed else {
            return Ok(());
        };
        self.emit(StoreEvent::ListsChanged);

        let result = self.persistence.delete_list(list_id).await;
        if let Err(e) = result {
            warn!("Deleting list {} failed, restoring: {}", list_id, e);
            self.store.borrow_mut().reinsert(index, list);
            self.emit(StoreEvent::ListsChanged);
            return Err(self.reject(Some(list_id), TaskError::Persistence(e.to_string())));
        }
        Ok(())
    }

    pub async fn rename_list(&self, list_id: &ListId, name: &str) -> TaskResult<()> {
        let name = TaskNode::validate_name(name, self.config.max_name_len)
            .map_err(|e| self.reject(Some(list_id), e))?;
        let previous = {
            let mut store = self.store.borrow_mut();
            let renamed = store
                .mutable_list(list_id)
                .map(|list| std::mem::replace(&mut list.name, name.clone()));
            renamed
        };
        let previous = previous.map_err(|e| self.reject(Some(list_id), e))?;
        self.emit(StoreEvent::ListsChanged);

        let result = self.persistence.rename_list(list_id, &name).await;
        if let Err(e) = result {
            warn!("Renaming list {} failed, restoring: {}", list_id, e);
            if self.store.borrow_mut().update(list_id, |list| list.name = previous) {
                self.emit(StoreEvent::ListsChanged);
            }
            return Err(self.reject(Some(list_id), TaskError::Persistence(e.to_string())));
        }
        Ok(())
    }

    // ========================
    // Internals
    // ========================

    /// Clone of a list's forest, rejecting read-only targets
    pub(crate) fn editable_tasks(&self, list_id: &ListId) -> TaskResult<Vec<TaskNode>> {
        let current = self
            .store
            .borrow()
            .editable_tasks(list_id)
            .map(|tasks| tasks.to_vec());
        current.map_err(|e| self.reject(Some(list_id), e))
    }

    /// Surface an error to listeners and hand it back for propagation
    pub(crate) fn reject(&self, list_id: Option<&ListId>, err: TaskError) -> TaskError {
        if list_id.is_some_and(ListId::is_placeholder) {
            self.emit(StoreEvent::SignInRequired);
        } else {
            self.emit(StoreEvent::Notice(Notice::error(err.to_string())));
        }
        err
    }

    pub(crate) fn emit(&self, event: StoreEvent) {
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&event);
        }
    }

    fn next_sequence(&self) -> u64 {
        let next = self.sequence.get() + 1;
        self.sequence.set(next);
        next
    }

    fn begin_flight(&self, list_id: &ListId, snapshot: &[TaskNode]) -> u64 {
        let id = self.next_sequence();
        let mut in_flight = self.in_flight.borrow_mut();
        let flight = in_flight.entry(list_id.clone()).or_insert_with(|| Flight {
            newest: id,
            outstanding: 0,
            confirmed: snapshot.to_vec(),
        });
        flight.newest = id;
        flight.outstanding += 1;
        id
    }

    /// Record a resolved write; `committed` is the forest storage accepted
    fn end_flight(&self, list_id: &ListId, id: u64, committed: Option<Vec<TaskNode>>) -> Landing {
        let mut in_flight = self.in_flight.borrow_mut();
        let Some(flight) = in_flight.get_mut(list_id) else {
            return Landing { newest: true, settled: None };
        };
        if let Some(forest) = committed {
            flight.confirmed = forest;
        }
        flight.outstanding = flight.outstanding.saturating_sub(1);
        let newest = flight.newest == id;
        if flight.outstanding > 0 {
            return Landing { newest, settled: None };
        }
        let settled = in_flight.remove(list_id).map(|flight| flight.confirmed);
        Landing { newest, settled }
    }

    /// Make the list match storage once nothing is outstanding for it
    fn settle(&self, list_id: &ListId, confirmed: Vec<TaskNode>) {
        let mut store = self.store.borrow_mut();
        let diverged = store.get(list_id).is_some_and(|list| list.tasks != confirmed);
        if diverged {
            debug!("List {} realigned with its stored forest", list_id);
            store.update(list_id, |list| list.tasks = confirmed);
        }
        store.mark_fresh(list_id);
    }

    /// Optional conservative re-fetch once no other write is outstanding
    async fn reconcile(&self) {
        if !self.config.refetch_after_commit || !self.in_flight.borrow().is_empty() {
            return;
        }
        if let Err(e) = self.refresh().await {
            warn!("Re-fetch after commit failed: {}", e);
        }
    }
}
