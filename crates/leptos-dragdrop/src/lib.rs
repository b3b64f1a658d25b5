//! Leptos DragDrop Utilities
//!
//! Mouse-event drag and drop for reordering siblings inside one group of a
//! tree. A press only becomes a drag after the pointer moves a few pixels, so
//! plain clicks keep working. Drops are only offered between siblings that
//! share the dragged row's parent.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

/// The row being pressed or dragged
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSource<T> {
    pub id: T,
    /// `None` for top-level rows
    pub parent: Option<T>,
    /// Position among its siblings
    pub index: usize,
}

/// A gap between siblings: dropping here inserts before `insertion`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropZone<T> {
    pub parent: Option<T>,
    pub insertion: usize,
}

/// Final index of a sibling moved from `from` into the gap before `insertion`.
///
/// `None` when the drop would leave the order unchanged.
pub fn reorder_target(from: usize, insertion: usize) -> Option<usize> {
    let to = if insertion > from { insertion - 1 } else { insertion };
    (to != from).then_some(to)
}

/// DnD state shared by every row of one tree
pub struct DndSignals<T: 'static> {
    pub dragging: RwSignal<Option<DragSource<T>>>,
    pub drop_zone: RwSignal<Option<DropZone<T>>>,
    /// Pressed but not yet moved past the threshold
    pub pending: RwSignal<Option<DragSource<T>>>,
    /// True for a moment after a drag so the trailing click can be ignored
    pub just_ended: RwSignal<bool>,
    start: RwSignal<(i32, i32)>,
}

impl<T> Clone for DndSignals<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DndSignals<T> {}

impl<T> DndSignals<T>
where
    T: Copy + PartialEq + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            dragging: RwSignal::new(None),
            drop_zone: RwSignal::new(None),
            pending: RwSignal::new(None),
            just_ended: RwSignal::new(false),
            start: RwSignal::new((0, 0)),
        }
    }

    pub fn is_dragging(&self, id: T) -> bool {
        self.dragging.with(|d| d.is_some_and(|d| d.id == id))
    }

    /// Whether a zone should light up for the current drag
    pub fn accepts(&self, zone: DropZone<T>) -> bool {
        self.dragging
            .with(|d| d.is_some_and(|d| d.parent == zone.parent))
    }

    pub fn is_active_zone(&self, zone: DropZone<T>) -> bool {
        self.drop_zone.with(|z| *z == Some(zone))
    }

    fn end(&self) {
        self.dragging.set(None);
        self.drop_zone.set(None);
        self.pending.set(None);
        self.just_ended.set(true);

        if let Some(win) = web_sys::window() {
            let clear = self.just_ended;
            let cb = Closure::<dyn FnMut()>::new(move || clear.set(false));
            let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
            cb.forget();
        }
    }
}

impl<T> Default for DndSignals<T>
where
    T: Copy + PartialEq + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Mousedown handler for a draggable row
pub fn make_on_mousedown<T>(dnd: DndSignals<T>, source: DragSource<T>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    T: Copy + PartialEq + Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Inputs and buttons inside the row keep their own behaviour
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some()
                || target.dyn_ref::<web_sys::HtmlButtonElement>().is_some()
                || target.dyn_ref::<web_sys::HtmlSelectElement>().is_some()
            {
                return;
            }
        }
        ev.stop_propagation();
        dnd.pending.set(Some(source));
        dnd.start.set((ev.client_x(), ev.client_y()));
    }
}

/// Mouseenter handler for a gap between siblings
pub fn make_on_zone_mouseenter<T>(dnd: DndSignals<T>, zone: DropZone<T>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    T: Copy + PartialEq + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.accepts(zone) {
            dnd.drop_zone.set(Some(zone));
        }
    }
}

pub fn make_on_zone_mouseleave<T>(dnd: DndSignals<T>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    T: Copy + PartialEq + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging.get_untracked().is_some() {
            dnd.drop_zone.set(None);
        }
    }
}

/// Bind document-level mousemove/mouseup. `on_drop` receives the dragged
/// source and the zone it was released over.
pub fn bind_global_handlers<T, F>(dnd: DndSignals<T>, on_drop: F)
where
    T: Copy + PartialEq + Send + Sync + 'static,
    F: Fn(DragSource<T>, DropZone<T>) + 'static,
{
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let Some(pending) = dnd.pending.get_untracked() else {
            return;
        };
        if dnd.dragging.get_untracked().is_some() {
            return;
        }
        let (x, y) = dnd.start.get_untracked();
        if (ev.client_x() - x).abs() > DRAG_THRESHOLD_PX || (ev.client_y() - y).abs() > DRAG_THRESHOLD_PX {
            dnd.dragging.set(Some(pending));
        }
    });

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragged = dnd.dragging.get_untracked();
        let zone = dnd.drop_zone.get_untracked();
        if dragged.is_none() && dnd.pending.get_untracked().is_none() {
            return;
        }
        dnd.end();
        if let (Some(source), Some(zone)) = (dragged, zone) {
            if source.parent == zone.parent {
                on_drop(source, zone);
            }
        }
    });

    let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    on_mousemove.forget();
    on_mouseup.forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_target() {
        // Gaps around the row itself change nothing
        assert_eq!(reorder_target(2, 2), None);
        assert_eq!(reorder_target(2, 3), None);
        // Moving up
        assert_eq!(reorder_target(2, 0), Some(0));
        // Moving down lands before the row that followed the gap
        assert_eq!(reorder_target(0, 3), Some(2));
        assert_eq!(reorder_target(0, 2), Some(1));
    }
}
