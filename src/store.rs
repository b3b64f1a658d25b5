//! UI State Store
//!
//! A reactive mirror of the engine's list store, refreshed from coordinator
//! events, plus purely visual state (notices, celebrations).

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use task_tree::{MutationCoordinator, StoreEvent};

use crate::models::{ListId, NoticeEntry, NoticeLevel, TaskId, TaskList};

const NOTICE_MS: u32 = 6_000;
const FLASH_MS: u32 = 900;
const CELEBRATE_MS: u32 = 3_000;

#[derive(Clone, Debug, Default, Store)]
pub struct UiState {
    pub lists: Vec<TaskList>,
    /// Lists with a write awaiting the backend
    pub pending: Vec<ListId>,
    pub signed_in: bool,
    /// Session has been loaded at least once
    pub loaded: bool,
    pub notices: Vec<NoticeEntry>,
    pub next_notice_id: u32,
    /// List whose last task was just completed
    pub celebrating: Option<ListId>,
    /// Task that was just completed
    pub flash_task: Option<TaskId>,
}

/// Type alias for the store
pub type UiStore = Store<UiState>;

/// Get the UI store from context
pub fn use_ui_store() -> UiStore {
    expect_context::<UiStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Copy lists and unsaved flags out of the coordinator
pub fn store_sync_lists(store: &UiStore, coordinator: &MutationCoordinator) {
    let lists = coordinator.lists();
    let pending = lists
        .iter()
        .filter(|list| coordinator.is_stale(&list.id))
        .map(|list| list.id.clone())
        .collect();
    store.lists().set(lists);
    store.pending().set(pending);
    store.signed_in().set(coordinator.is_authenticated());
}

/// Show a notice and schedule its removal
pub fn store_push_notice(store: &UiStore, level: NoticeLevel, message: String) {
    let id = {
        let next_field = store.next_notice_id();
        let mut next = next_field.write();
        *next += 1;
        *next
    };
    store.notices().write().push(NoticeEntry { id, level, message });

    let store = *store;
    spawn_local(async move {
        TimeoutFuture::new(NOTICE_MS).await;
        store_dismiss_notice(&store, id);
    });
}

pub fn store_dismiss_notice(store: &UiStore, id: u32) {
    store.notices().write().retain(|notice| notice.id != id);
}

/// React to one coordinator event
pub fn store_apply_event(store: &UiStore, coordinator: &MutationCoordinator, event: &StoreEvent) {
    match event {
        StoreEvent::ListsChanged => store_sync_lists(store, coordinator),
        StoreEvent::TaskCompleted { task_id, .. } => {
            let task_id = *task_id;
            store.flash_task().set(Some(task_id));
            let store = *store;
            spawn_local(async move {
                TimeoutFuture::new(FLASH_MS).await;
                if store.flash_task().get_untracked() == Some(task_id) {
                    store.flash_task().set(None);
                }
            });
        }
        StoreEvent::ListCompleted { list_id } => {
            store.celebrating().set(Some(list_id.clone()));
            let name = coordinator.list(list_id).map(|l| l.name).unwrap_or_default();
            store_push_notice(store, NoticeLevel::Info, format!("Everything in \"{}\" is done!", name));
            let store = *store;
            spawn_local(async move {
                TimeoutFuture::new(CELEBRATE_MS).await;
                store.celebrating().set(None);
            });
        }
        StoreEvent::SignInRequired => store_push_notice(
            store,
            NoticeLevel::Info,
            "Preview lists are read-only. Set a user_id in config.json to keep your own lists.".to_string(),
        ),
        StoreEvent::Notice(notice) => store_push_notice(store, notice.level, notice.message.clone()),
    }
}
