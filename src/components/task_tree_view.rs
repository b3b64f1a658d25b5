//! Task Tree View Component
//!
//! Renders a list's forest as indented rows with drop zones between siblings.
//! The drag state is shared app-wide and bound once in `App`.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_mousedown, DndSignals, DragSource};

use crate::components::{DropZone, TaskRowView};
use crate::context::AppContext;
use crate::models::{ListId, TaskId};
use crate::store::{use_ui_store, UiStateStoreFields};
use crate::tree::flatten_rows;

#[component]
pub fn TaskTreeView(list_id: ListId, dnd: DndSignals<TaskId>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_ui_store();

    let rows = {
        let list_id = list_id.clone();
        move || {
            let collapsed = ctx.collapsed.get();
            store
                .lists()
                .read()
                .iter()
                .find(|list| list.id == list_id)
                .map(|list| flatten_rows(&list.tasks, &collapsed))
                .unwrap_or_default()
        }
    };
    let is_empty = {
        let rows = rows.clone();
        move || rows().is_empty()
    };
    let unreadable = {
        let list_id = list_id.clone();
        move || store.lists().read().iter().any(|list| list.id == list_id && list.unreadable)
    };

    view! {
        <div class="tree-view">
            <Show when=unreadable>
                <p class="damaged-hint">
                    "The saved tasks of this list could not be read. They are kept as they are and editing is disabled."
                </p>
            </Show>
            <Show when=is_empty>
                <p class="empty-hint">"No tasks yet. Add one above."</p>
            </Show>
            <For
                each=rows
                key=|row| {
                    // Every field that changes the row's rendering
                    (
                        row.id,
                        row.name.clone(),
                        row.completed,
                        row.priority,
                        row.depth,
                        row.index,
                        row.leads_group,
                        row.progress,
                        row.collapsed,
                    )
                }
                children=move |row| {
                    let id = row.id;
                    let source = DragSource { id, parent: row.parent, index: row.index };
                    let on_mousedown = make_on_mousedown(dnd, source);
                    let row_class = move || {
                        if dnd.is_dragging(id) { "task-row-wrapper dragging" } else { "task-row-wrapper" }
                    };

                    view! {
                        // Gap before the first row shown in a sibling group
                        {row.leads_group.map(|insertion| view! {
                            <DropZone dnd=dnd parent=row.parent insertion=insertion depth=row.depth />
                        })}
                        <div class=row_class on:mousedown=on_mousedown>
                            <TaskRowView row=row.clone() list_id=list_id.clone() />
                        </div>
                        // Gap after this row, same parent
                        <DropZone dnd=dnd parent=row.parent insertion=row.index + 1 depth=row.depth />
                    }
                }
            />
        </div>
    }
}
