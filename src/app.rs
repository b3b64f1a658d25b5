//! TaskDeck Frontend App
//!
//! Wires the task engine to the Tauri backend and lays out the list tabs,
//! the entry forms and the task tree.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{bind_global_handlers, reorder_target, DndSignals};
use reactive_stores::Store;
use task_tree::tree::completion_ratio;
use task_tree::{Decomposer, ListStore, MutationCoordinator, TaskTreeConfig};

use crate::commands::{self, TauriBackend};
use crate::components::{DecomposeForm, ListTabBar, LogPanel, NewTaskForm, NoticeBar, TaskTreeView};
use crate::context::AppContext;
use crate::models::{ListId, TaskId};
use crate::store::{store_apply_event, store_sync_lists, UiState, UiStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    // Start empty in preview mode until the session is known
    let coordinator = MutationCoordinator::new(
        ListStore::preview_with(Vec::new()),
        Rc::new(TauriBackend),
        TaskTreeConfig::default(),
    );
    let decomposer = Decomposer::new(coordinator.clone(), Rc::new(TauriBackend));

    let store = Store::new(UiState::default());
    provide_context(store);

    {
        let listener_coordinator = coordinator.clone();
        coordinator.subscribe(move |event| store_apply_event(&store, &listener_coordinator, event));
    }

    let ctx = AppContext::new(coordinator, decomposer);
    provide_context(ctx);

    // One drag state for the whole tree; the drop target list is read at drop time
    let dnd = DndSignals::<TaskId>::new();
    bind_global_handlers(dnd, move |source, zone| {
        let Some(list_id) = ctx.current_list.get_untracked() else {
            return;
        };
        let Some(to) = reorder_target(source.index, zone.insertion) else {
            return;
        };
        ctx.run(move |c| async move { c.reorder(&list_id, source.parent, source.index, to).await });
    });

    // Load session on mount
    spawn_local(async move {
        let user_id = match commands::get_session().await {
            Ok(user_id) => user_id,
            Err(e) => {
                web_sys::console::error_1(&format!("[APP] get_session failed: {}", e).into());
                None
            }
        };
        let coordinator = ctx.coordinator();
        if let Err(e) = coordinator.load_session(user_id.as_deref()).await {
            web_sys::console::warn_1(&format!("[APP] load_session: {}", e).into());
        }
        store_sync_lists(&store, &coordinator);
        store.loaded().set(true);
    });

    // Keep a valid list selected
    Effect::new(move |_| {
        let lists = store.lists().get();
        let current = ctx.current_list.get();
        let still_there = current
            .as_ref()
            .is_some_and(|id| lists.iter().any(|list| &list.id == id));
        if !still_there {
            ctx.select_list(lists.first().map(|list| list.id.clone()));
        }
    });

    let current_title = move || {
        let id = ctx.current_list.get()?;
        store
            .lists()
            .read()
            .iter()
            .find(|list| list.id == id)
            .map(|list| (list.name.clone(), completion_ratio(&list.tasks)))
    };

    view! {
        <div class="app-layout">
            <header class="app-header">
                <h1>"TaskDeck"</h1>
                <Show when=move || store.loaded().get() && !store.signed_in().get()>
                    <span class="preview-badge" title="Set user_id in config.json to keep your own lists">
                        "Preview"
                    </span>
                </Show>
                <LogPanel />
            </header>

            <ListTabBar />
            <NoticeBar />

            <main class="list-content">
                {move || match ctx.current_list.get() {
                    Some(list_id) => view! {
                        <CurrentList list_id=list_id dnd=dnd title=Signal::derive(current_title) />
                    }.into_any(),
                    None => view! {
                        <div class="empty-state">
                            {move || if store.loaded().get() { "Create a list to get started." } else { "Loading..." }}
                        </div>
                    }.into_any(),
                }}
            </main>
        </div>
    }
}

#[component]
fn CurrentList(
    list_id: ListId,
    dnd: DndSignals<TaskId>,
    title: Signal<Option<(String, String)>>,
) -> impl IntoView {
    view! {
        <div class="list-header">
            <h2>{move || title.get().map(|(name, _)| name).unwrap_or_default()}</h2>
            <span class="list-ratio">{move || title.get().map(|(_, ratio)| ratio).unwrap_or_default()}</span>
        </div>
        <NewTaskForm list_id=list_id.clone() />
        <DecomposeForm list_id=list_id.clone() />
        <TaskTreeView list_id=list_id dnd=dnd />
    }
}
