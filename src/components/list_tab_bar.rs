//! List Tab Bar Component
//!
//! Tab bar for switching between task lists, with create, rename and delete.

use leptos::prelude::*;
use task_tree::tree::{completion_ratio, count_nodes};

use crate::components::DeleteConfirmButton;
use crate::context::AppContext;
use crate::models::ListId;
use crate::store::{use_ui_store, UiStateStoreFields};
use crate::tree::rename_to_commit;

#[component]
pub fn ListTabBar() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_ui_store();
    let (adding, set_adding) = signal(false);
    let (new_name, set_new_name) = signal(String::new());
    let (renaming, set_renaming) = signal::<Option<ListId>>(None);

    let on_add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = new_name.get();
        if name.trim().is_empty() {
            return;
        }
        set_new_name.set(String::new());
        set_adding.set(false);

        let coordinator = ctx.coordinator();
        leptos::task::spawn_local(async move {
            // The pending tab is already visible; switch once it has a real id
            if let Ok(id) = coordinator.create_list(&name).await {
                ctx.select_list(Some(id));
            }
        });
    };

    view! {
        <div class="list-tab-bar">
            <For
                each=move || store.lists().get()
                key=|list| (list.id.clone(), list.name.clone(), completion_ratio(&list.tasks))
                children=move |list| {
                    let id = list.id.clone();
                    let persisted = list.id.is_persisted();
                    let ratio = completion_ratio(&list.tasks);

                    let tab_class = {
                        let id = id.clone();
                        move || {
                            let mut c = String::from("list-tab");
                            if ctx.current_list.get().as_ref() == Some(&id) {
                                c.push_str(" active");
                            }
                            if store.pending().read().contains(&id) {
                                c.push_str(" pending");
                            }
                            if store.celebrating().get().as_ref() == Some(&id) {
                                c.push_str(" celebrating");
                            }
                            c
                        }
                    };
                    let is_renaming = {
                        let id = id.clone();
                        move || renaming.get().as_ref() == Some(&id)
                    };
                    let on_select = {
                        let id = id.clone();
                        move |_| ctx.select_list(Some(id.clone()))
                    };
                    let on_rename_start = {
                        let id = id.clone();
                        move |_| {
                            if persisted {
                                set_renaming.set(Some(id.clone()));
                            }
                        }
                    };
                    let commit_rename = {
                        let id = id.clone();
                        let original = list.name.clone();
                        move |draft: String| {
                            let still_editing = renaming.get_untracked().as_ref() == Some(&id);
                            let Some(name) = rename_to_commit(still_editing, &draft, &original) else {
                                if still_editing {
                                    set_renaming.set(None);
                                }
                                return;
                            };
                            set_renaming.set(None);
                            let id = id.clone();
                            ctx.run(move |c| async move { c.rename_list(&id, &name).await });
                        }
                    };
                    let on_delete = {
                        let id = id.clone();
                        Callback::new(move |_: ()| {
                            let id = id.clone();
                            if ctx.current_list.get_untracked().as_ref() == Some(&id) {
                                ctx.select_list(None);
                            }
                            ctx.run(move |c| async move { c.delete_list(&id).await });
                        })
                    };
                    let name = list.name.clone();
                    let delete_prompt = match count_nodes(&list.tasks) {
                        0 => format!("Delete \"{}\"?", list.name),
                        n => format!("Delete \"{}\" and its {} tasks?", list.name, n),
                    };

                    view! {
                        <div class=tab_class>
                            <Show
                                when=is_renaming
                                fallback={
                                    let name = name.clone();
                                    let ratio = ratio.clone();
                                    let on_select = on_select.clone();
                                    move || view! {
                                        <button
                                            class="list-tab-label"
                                            title="Double-click to rename"
                                            on:click=on_select.clone()
                                            on:dblclick=on_rename_start.clone()
                                        >
                                            {name.clone()}
                                            <span class="list-ratio">{ratio.clone()}</span>
                                        </button>
                                    }
                                }
                            >
                                <input
                                    class="list-rename-input"
                                    type="text"
                                    value=name.clone()
                                    on:blur={
                                        let commit_rename = commit_rename.clone();
                                        move |ev| commit_rename(event_target_value(&ev))
                                    }
                                    on:keydown={
                                        let commit_rename = commit_rename.clone();
                                        move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
                                            "Enter" => commit_rename(event_target_value(&ev)),
                                            "Escape" => set_renaming.set(None),
                                            _ => {}
                                        }
                                    }
                                />
                            </Show>
                            {persisted.then(|| view! {
                                <DeleteConfirmButton button_class="list-delete-btn" prompt=delete_prompt.clone() on_confirm=on_delete />
                            })}
                        </div>
                    }
                }
            />

            {move || if adding.get() {
                view! {
                    <form class="list-add-form" on:submit=on_add>
                        <input
                            type="text"
                            placeholder="List name"
                            prop:value=move || new_name.get()
                            on:input=move |ev| set_new_name.set(event_target_value(&ev))
                        />
                        <button type="submit">"+"</button>
                        <button type="button" on:click=move |_| set_adding.set(false)>"×"</button>
                    </form>
                }.into_any()
            } else {
                view! {
                    <button
                        class="list-add-btn"
                        title="New list"
                        disabled=move || !store.signed_in().get()
                        on:click=move |_| set_adding.set(true)
                    >
                        "+"
                    </button>
                }.into_any()
            }}
        </div>
    }
}
