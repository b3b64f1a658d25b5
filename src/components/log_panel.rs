//! Log Panel Component
//!
//! Toggleable view of the backend's most recent log lines.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;

#[component]
pub fn LogPanel() -> impl IntoView {
    let (open, set_open) = signal(false);
    let (lines, set_lines) = signal(Vec::<String>::new());

    let refresh = move || {
        spawn_local(async move {
            match commands::recent_logs().await {
                Ok(loaded) => set_lines.set(loaded),
                Err(e) => set_lines.set(vec![format!("Could not load logs: {}", e)]),
            }
        });
    };

    let on_toggle = move |_| {
        let opening = !open.get_untracked();
        set_open.set(opening);
        if opening {
            refresh();
        }
    };

    view! {
        <button class="log-toggle-btn" title="Recent log lines" on:click=on_toggle>
            "Logs"
        </button>
        <Show when=move || open.get()>
            <div class="log-panel">
                <div class="log-panel-header">
                    <span>"Recent log lines"</span>
                    <button on:click=move |_| refresh()>"Refresh"</button>
                    <button on:click=move |_| set_open.set(false)>"×"</button>
                </div>
                <pre class="log-lines">{move || lines.get().join("\n")}</pre>
            </div>
        </Show>
    }
}
