//! New Task Form Component
//!
//! Adds a top-level task, or a subtask when a row's "+" was clicked.

use leptos::prelude::*;
use task_tree::tree::find_by_id;

use crate::context::AppContext;
use crate::models::ListId;
use crate::store::{use_ui_store, UiStateStoreFields};

#[component]
pub fn NewTaskForm(list_id: ListId) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_ui_store();
    let (new_text, set_new_text) = signal(String::new());

    // Name of the task we are adding under, if any
    let parent_name = {
        let list_id = list_id.clone();
        move || {
            let parent = ctx.adding_under.get()?;
            store
                .lists()
                .read()
                .iter()
                .find(|list| list.id == list_id)
                .and_then(|list| find_by_id(&list.tasks, parent).map(|task| task.name.clone()))
        }
    };
    let placeholder = {
        let parent_name = parent_name.clone();
        move || match parent_name() {
            Some(name) => format!("Add subtask under \"{}\"...", name),
            None => "Add a task...".to_string(),
        }
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = new_text.get();
        if text.trim().is_empty() {
            return;
        }
        let parent = ctx.adding_under.get_untracked();
        let list_id = list_id.clone();
        // The task shows up immediately, so clear the input right away
        set_new_text.set(String::new());
        ctx.set_adding_under(None);
        ctx.run(move |c| async move { c.add_task(&list_id, &text, parent).await });
    };

    view! {
        <form class="new-task-form" on:submit=on_submit>
            <div class="new-task-row">
                <input
                    type="text"
                    placeholder=placeholder
                    prop:value=move || new_text.get()
                    on:input=move |ev| set_new_text.set(event_target_value(&ev))
                />
                <button type="submit">"Add"</button>
                {move || parent_name().map(|_| view! {
                    <button type="button" class="cancel-btn" on:click=move |_| ctx.set_adding_under(None)>
                        "Cancel"
                    </button>
                })}
            </div>
        </form>
    }
}
