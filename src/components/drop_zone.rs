//! Drop Zone Component
//!
//! A horizontal gap between sibling rows that accepts a dragged sibling.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_zone_mouseenter, make_on_zone_mouseleave, DndSignals, DropZone as Gap};

use crate::models::TaskId;

#[component]
pub fn DropZone(
    dnd: DndSignals<TaskId>,
    /// Sibling group (None = top level)
    parent: Option<TaskId>,
    /// Stored index the dragged row is inserted before
    insertion: usize,
    depth: usize,
) -> impl IntoView {
    let gap = Gap { parent, insertion };
    let on_mouseenter = make_on_zone_mouseenter(dnd, gap);
    let on_mouseleave = make_on_zone_mouseleave(dnd);

    let zone_class = move || {
        let mut c = String::from("drop-zone");
        if !dnd.accepts(gap) {
            c.push_str(" hidden");
        }
        if dnd.is_active_zone(gap) {
            c.push_str(" active");
        }
        c
    };

    view! {
        <div
            class=zone_class
            style=format!("margin-left: {}px;", depth * 24)
            on:mouseenter=on_mouseenter
            on:mouseleave=on_mouseleave
        />
    }
}
