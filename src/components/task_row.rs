//! Task Row Component
//!
//! One task in the tree: collapse toggle, checkbox, editable name, subtask
//! progress, priority, add-subtask and delete.

use leptos::prelude::*;

use crate::components::{DeleteConfirmButton, PrioritySelector};
use crate::context::AppContext;
use crate::models::ListId;
use crate::store::{use_ui_store, UiStateStoreFields};
use crate::tree::{rename_to_commit, TaskRow};

#[component]
pub fn TaskRowView(row: TaskRow, list_id: ListId) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_ui_store();

    let id = row.id;
    let completed = row.completed;
    let read_only = list_id.is_placeholder();
    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(row.name.clone());

    let is_flashing = move || store.flash_task().get() == Some(id);
    let row_class = move || {
        let mut c = String::from("task-row");
        if completed {
            c.push_str(" completed");
        }
        if is_flashing() {
            c.push_str(" flash");
        }
        c
    };

    let toggle = {
        let list_id = list_id.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            if read_only {
                // Keep the checkbox as it was; the engine explains why
                ev.prevent_default();
            }
            let list_id = list_id.clone();
            ctx.run(move |c| async move { c.toggle_completion(&list_id, id).await });
        }
    };

    let commit_rename = {
        let list_id = list_id.clone();
        let original = row.name.clone();
        move || {
            let Some(name) = rename_to_commit(editing.get_untracked(), &draft.get_untracked(), &original) else {
                set_editing.set(false);
                return;
            };
            set_editing.set(false);
            let list_id = list_id.clone();
            ctx.run(move |c| async move { c.rename_task(&list_id, id, &name).await });
        }
    };
    let commit_on_key = commit_rename.clone();

    let set_priority = {
        let list_id = list_id.clone();
        Callback::new(move |level: u8| {
            let list_id = list_id.clone();
            ctx.run(move |c| async move { c.set_priority(&list_id, id, level).await });
        })
    };

    let delete = {
        let list_id = list_id.clone();
        Callback::new(move |_: ()| {
            let list_id = list_id.clone();
            ctx.run(move |c| async move { c.delete_task(&list_id, id).await });
        })
    };

    let name = row.name.clone();
    let delete_prompt = match row.progress {
        Some((_, total)) => format!("Delete with its {} subtasks?", total),
        None => "Delete task?".to_string(),
    };

    view! {
        <div class=row_class style=format!("margin-left: {}px;", row.depth * 24)>
            // Collapse toggle
            {match row.progress {
                Some(_) => {
                    view! {
                        <button class="collapse-btn" on:click=move |_| ctx.toggle_collapsed(id)>
                            {if row.collapsed { "▶" } else { "▼" }}
                        </button>
                    }
                        .into_any()
                }
                None => view! { <span class="collapse-placeholder">"·"</span> }.into_any(),
            }}

            <input type="checkbox" prop:checked=completed on:click=toggle />

            <Show
                when=move || editing.get()
                fallback=move || {
                    let name = name.clone();
                    view! {
                        <span
                            class="task-name"
                            title="Double-click to rename"
                            on:dblclick=move |_| {
                                if !read_only {
                                    set_editing.set(true);
                                }
                            }
                        >
                            {name}
                        </span>
                    }
                }
            >
                <input
                    class="task-name-input"
                    type="text"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    on:blur={
                        let commit_rename = commit_rename.clone();
                        move |_| commit_rename()
                    }
                    on:keydown={
                        let commit_on_key = commit_on_key.clone();
                        move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                            "Enter" => commit_on_key(),
                            "Escape" => set_editing.set(false),
                            _ => {}
                        }
                    }
                />
            </Show>

            {row.progress.map(|(done, total)| view! {
                <span class="task-progress">{format!("{}/{}", done, total)}</span>
            })}

            <PrioritySelector current=row.priority on_change=set_priority />

            <button class="add-child-btn" title="Add subtask" on:click=move |ev| {
                ev.stop_propagation();
                ctx.set_adding_under(Some(id));
            }>"+"</button>

            <DeleteConfirmButton button_class="delete-btn" prompt=delete_prompt on_confirm=delete />
        </div>
    }
}
