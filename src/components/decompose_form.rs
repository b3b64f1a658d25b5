//! Decompose Form Component
//!
//! Sends a task description to the AI and adds the result as a task with
//! suggested subtasks.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::AppContext;
use crate::models::ListId;

#[component]
pub fn DecomposeForm(list_id: ListId) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (description, set_description) = signal(String::new());
    let (busy, set_busy) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = description.get();
        if text.trim().is_empty() || busy.get_untracked() {
            return;
        }
        set_busy.set(true);
        let list_id = list_id.clone();
        let decomposer = ctx.decomposer();
        spawn_local(async move {
            match decomposer.decompose(&list_id, &text).await {
                Ok(outcome) => {
                    web_sys::console::log_1(
                        &format!("[AI] Added {} subtasks under {}", outcome.subtask_count, outcome.parent_id).into(),
                    );
                    set_description.set(String::new());
                }
                // Already shown as a notice; keep the text for another try
                Err(e) => web_sys::console::warn_1(&format!("[AI] {}", e).into()),
            }
            set_busy.set(false);
        });
    };

    view! {
        <form class="decompose-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="Describe a bigger task and let AI break it down..."
                prop:value=move || description.get()
                prop:disabled=move || busy.get()
                on:input=move |ev| set_description.set(event_target_value(&ev))
            />
            <button type="submit" disabled=move || busy.get()>
                {move || if busy.get() { "Thinking..." } else { "Break down" }}
            </button>
        </form>
    }
}
