//! Application Context
//!
//! Shared handles provided via Leptos Context API. The engine objects are
//! single-threaded, so they live in local-only stored values.

use std::collections::HashSet;
use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use task_tree::{Decomposer, MutationCoordinator, TaskResult};

use crate::models::{ListId, TaskId};

#[derive(Clone, Copy)]
pub struct AppContext {
    coordinator: StoredValue<MutationCoordinator, LocalStorage>,
    decomposer: StoredValue<Decomposer, LocalStorage>,
    /// Selected list tab
    pub current_list: ReadSignal<Option<ListId>>,
    set_current_list: WriteSignal<Option<ListId>>,
    /// Which task to add a subtask under (None = top level)
    pub adding_under: ReadSignal<Option<TaskId>>,
    set_adding_under: WriteSignal<Option<TaskId>>,
    /// Tasks whose subtasks are hidden; view state only
    pub collapsed: ReadSignal<HashSet<TaskId>>,
    set_collapsed: WriteSignal<HashSet<TaskId>>,
}

impl AppContext {
    pub fn new(coordinator: MutationCoordinator, decomposer: Decomposer) -> Self {
        let (current_list, set_current_list) = signal(None);
        let (adding_under, set_adding_under) = signal(None);
        let (collapsed, set_collapsed) = signal(HashSet::new());
        Self {
            coordinator: StoredValue::new_local(coordinator),
            decomposer: StoredValue::new_local(decomposer),
            current_list,
            set_current_list,
            adding_under,
            set_adding_under,
            collapsed,
            set_collapsed,
        }
    }

    pub fn coordinator(&self) -> MutationCoordinator {
        self.coordinator.get_value()
    }

    pub fn decomposer(&self) -> Decomposer {
        self.decomposer.get_value()
    }

    pub fn select_list(&self, id: Option<ListId>) {
        self.set_adding_under.set(None);
        self.set_current_list.set(id);
    }

    /// Set parent for the next new task
    pub fn set_adding_under(&self, parent_id: Option<TaskId>) {
        self.set_adding_under.set(parent_id);
    }

    pub fn toggle_collapsed(&self, id: TaskId) {
        self.set_collapsed.update(|collapsed| {
            if !collapsed.remove(&id) {
                collapsed.insert(id);
            }
        });
    }

    /// Run an engine operation in the background. Failures have already been
    /// reported to listeners, so they are only logged here.
    pub fn run<T, F, Fut>(&self, op: F)
    where
        T: 'static,
        F: FnOnce(MutationCoordinator) -> Fut + 'static,
        Fut: Future<Output = TaskResult<T>> + 'static,
    {
        let coordinator = self.coordinator();
        spawn_local(async move {
            if let Err(e) = op(coordinator).await {
                web_sys::console::warn_1(&format!("[TASKS] {} ({})", e, e.kind()).into());
            }
        });
    }
}
