//! Notice Bar Component
//!
//! Stack of dismissable messages raised by the task engine.

use leptos::prelude::*;

use crate::store::{store_dismiss_notice, use_ui_store, UiStateStoreFields};

#[component]
pub fn NoticeBar() -> impl IntoView {
    let store = use_ui_store();

    view! {
        <div class="notice-bar">
            <For
                each=move || store.notices().get()
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div class=notice.css_class()>
                            <span class="notice-text">{notice.message.clone()}</span>
                            <button class="notice-close" on:click=move |_| store_dismiss_notice(&store, id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
