//! List Store
//!
//! The in-memory source of truth for the active session's task lists.
//! Signed-in sessions hold the lists fetched from storage; signed-out visitors
//! get a fixed set of read-only placeholder lists for preview.

use std::collections::HashMap;

use crate::domain::{ListId, ListKind, Priority, TaskError, TaskList, TaskNode, TaskResult};

/// Who the store is populated for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Authenticated { user_id: String },
    Preview,
}

/// Whether a list's in-memory forest matches what storage last confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

#[derive(Debug, Clone)]
pub struct ListStore {
    mode: SessionMode,
    lists: Vec<TaskList>,
    freshness: HashMap<ListId, Freshness>,
}

impl ListStore {
    /// Signed-out store with the sample lists
    pub fn preview() -> Self {
        Self::preview_with(placeholder_lists())
    }

    /// Signed-out store with the given read-only lists
    pub fn preview_with(lists: Vec<TaskList>) -> Self {
        Self {
            mode: SessionMode::Preview,
            lists,
            freshness: HashMap::new(),
        }
    }

    /// Signed-in store populated from a fetch; every list starts fresh
    pub fn authenticated(user_id: impl Into<String>, lists: Vec<TaskList>) -> Self {
        let mut store = Self {
            mode: SessionMode::Authenticated { user_id: user_id.into() },
            lists: Vec::new(),
            freshness: HashMap::new(),
        };
        store.replace_all(lists);
        store
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn user_id(&self) -> Option<&str> {
        match &self.mode {
            SessionMode::Authenticated { user_id } => Some(user_id),
            SessionMode::Preview => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id().is_some()
    }

    pub fn lists(&self) -> &[TaskList] {
        &self.lists
    }

    pub fn get(&self, id: &ListId) -> Option<&TaskList> {
        self.lists.iter().find(|list| &list.id == id)
    }

    /// Reject unknown, placeholder and pending lists
    pub fn check_mutable(&self, id: &ListId) -> TaskResult<()> {
        match id.kind() {
            ListKind::Placeholder => {
                return Err(TaskError::InvalidTarget(format!(
                    "preview list {} is read-only, sign in to edit",
                    id
                )))
            }
            ListKind::Pending => {
                return Err(TaskError::InvalidTarget(format!("list {} is still being created", id)))
            }
            ListKind::Persisted => {}
        }
        if self.get(id).is_none() {
            return Err(TaskError::InvalidTarget(format!("list {} not found", id)));
        }
        Ok(())
    }

    pub fn mutable_list(&mut self, id: &ListId) -> TaskResult<&mut TaskList> {
        self.check_mutable(id)?;
        self.lists
            .iter_mut()
            .find(|list| &list.id == id)
            .ok_or_else(|| TaskError::InvalidTarget(format!("list {} not found", id)))
    }

    /// Like [`check_mutable`](Self::check_mutable), but also refuses lists
    /// whose stored tasks could not be read; a replace would erase them
    pub fn check_tasks_writable(&self, id: &ListId) -> TaskResult<()> {
        self.check_mutable(id)?;
        if self.get(id).is_some_and(|list| list.unreadable) {
            return Err(TaskError::InvalidTarget(format!(
                "the stored tasks of list {} could not be read",
                id
            )));
        }
        Ok(())
    }

    /// The forest of a list, for replacing
    pub fn mutable_tasks(&mut self, id: &ListId) -> TaskResult<&mut Vec<TaskNode>> {
        self.check_tasks_writable(id)?;
        self.mutable_list(id).map(|list| &mut list.tasks)
    }

    /// Current forest of a list that may be edited
    pub fn editable_tasks(&self, id: &ListId) -> TaskResult<&[TaskNode]> {
        self.check_tasks_writable(id)?;
        self.get(id)
            .map(|list| list.tasks.as_slice())
            .ok_or_else(|| TaskError::InvalidTarget(format!("list {} not found", id)))
    }

    /// Apply `edit` to a list if it is still present
    pub fn update(&mut self, id: &ListId, edit: impl FnOnce(&mut TaskList)) -> bool {
        match self.lists.iter_mut().find(|list| &list.id == id) {
            Some(list) => {
                edit(list);
                true
            }
            None => false,
        }
    }

    pub fn insert(&mut self, list: TaskList) {
        self.freshness.insert(list.id.clone(), Freshness::Stale);
        self.lists.push(list);
    }

    /// Remove a list, returning its former position for reinsertion
    pub fn remove(&mut self, id: &ListId) -> Option<(usize, TaskList)> {
        let index = self.lists.iter().position(|list| &list.id == id)?;
        self.freshness.remove(id);
        Some((index, self.lists.remove(index)))
    }

    /// Put back a list whose removal storage refused, clamping the index if
    /// the collection shrank. Storage still holds it as it was.
    pub fn reinsert(&mut self, index: usize, list: TaskList) {
        let index = index.min(self.lists.len());
        self.freshness.insert(list.id.clone(), Freshness::Fresh);
        self.lists.insert(index, list);
    }

    /// Swap a pending id for the one storage assigned
    pub fn replace_id(&mut self, old: &ListId, new: ListId) -> bool {
        let Some(list) = self.lists.iter_mut().find(|list| &list.id == old) else {
            return false;
        };
        list.id = new.clone();
        self.freshness.remove(old);
        self.freshness.insert(new, Freshness::Fresh);
        true
    }

    /// Replace every list with a fresh fetch
    pub fn replace_all(&mut self, lists: Vec<TaskList>) {
        self.freshness = lists
            .iter()
            .map(|list| (list.id.clone(), Freshness::Fresh))
            .collect();
        self.lists = lists;
    }

    pub fn mark_fresh(&mut self, id: &ListId) {
        if self.get(id).is_some() {
            self.freshness.insert(id.clone(), Freshness::Fresh);
        }
    }

    pub fn invalidate(&mut self, id: &ListId) {
        if self.get(id).is_some() {
            self.freshness.insert(id.clone(), Freshness::Stale);
        }
    }

    pub fn is_fresh(&self, id: &ListId) -> bool {
        self.freshness.get(id) == Some(&Freshness::Fresh)
    }
}

impl Default for ListStore {
    fn default() -> Self {
        Self::preview()
    }
}

/// Sample content shown to signed-out visitors
pub fn placeholder_lists() -> Vec<TaskList> {
    let mut welcome = vec![
        TaskNode::new("Sign in to create your own lists").with_priority(Priority::High),
        TaskNode::new("Break big tasks into subtasks")
            .with_priority(Priority::Medium)
            .with_subtasks(vec![
                TaskNode::new("Add a subtask with +"),
                TaskNode::new("Drag to reorder"),
            ]),
        TaskNode::new("Let AI suggest the steps").with_priority(Priority::Low),
    ];
    welcome[2].completed = true;

    let groceries = vec![
        TaskNode::new("Vegetables").with_subtasks(vec![
            TaskNode::new("Spinach"),
            TaskNode::new("Carrots"),
        ]),
        TaskNode::new("Coffee beans").with_priority(Priority::High),
    ];

    vec![
        TaskList::new(ListId::placeholder(1), "Getting started").with_tasks(welcome),
        TaskList::new(ListId::placeholder(2), "Groceries").with_tasks(groceries),
    ]
}
