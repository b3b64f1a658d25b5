//! Priority Selector Component

use leptos::prelude::*;

use crate::models::Priority;

/// Dropdown of the four priority levels; reports the chosen level
#[component]
pub fn PrioritySelector(current: Priority, #[prop(into)] on_change: Callback<u8>) -> impl IntoView {
    view! {
        <select
            class=format!("priority-select priority-{}", current.level())
            title="Priority"
            on:change=move |ev| {
                if let Ok(level) = event_target_value(&ev).parse::<u8>() {
                    on_change.run(level);
                }
            }
        >
            {Priority::ALL
                .iter()
                .map(|priority| {
                    view! {
                        <option value=priority.level().to_string() selected=*priority == current>
                            {priority.label()}
                        </option>
                    }
                })
                .collect_view()}
        </select>
    }
}
