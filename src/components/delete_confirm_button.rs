//! Delete Confirm Button Component
//!
//! Two-step delete for tasks and lists. Deleting a task takes its whole
//! subtree and deleting a list takes every task in it, so the first click only
//! asks; the prompt names what goes.

use leptos::prelude::*;

#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] button_class: String,
    /// Question shown while confirming, e.g. "Delete list and its 4 tasks?"
    #[prop(into)]
    prompt: Signal<String>,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (asking, set_asking) = signal(false);

    let ask = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        set_asking.set(true);
    };
    let confirm = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        set_asking.set(false);
        on_confirm.run(());
    };
    let back_out = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        set_asking.set(false);
    };

    view! {
        {move || if asking.get() {
            // Moving away from the prompt counts as "no"
            view! {
                <span class="delete-confirm" on:mouseleave=move |_| set_asking.set(false)>
                    <span class="delete-confirm-text">{move || prompt.get()}</span>
                    <button class="confirm-btn" title="Delete" on:click=confirm>"Delete"</button>
                    <button class="cancel-btn" title="Keep" on:click=back_out>"Keep"</button>
                </span>
            }.into_any()
        } else {
            view! {
                <button class=button_class.clone() title="Delete" on:click=ask>"×"</button>
            }.into_any()
        }}
    }
}
