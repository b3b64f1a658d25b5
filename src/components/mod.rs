//! UI Components
//!
//! Reusable Leptos components.

mod decompose_form;
mod delete_confirm_button;
mod drop_zone;
mod list_tab_bar;
mod log_panel;
mod new_task_form;
mod notice_bar;
mod priority_selector;
mod task_row;
mod task_tree_view;

pub use decompose_form::DecomposeForm;
pub use delete_confirm_button::DeleteConfirmButton;
pub use drop_zone::DropZone;
pub use list_tab_bar::ListTabBar;
pub use log_panel::LogPanel;
pub use new_task_form::NewTaskForm;
pub use notice_bar::NoticeBar;
pub use priority_selector::PrioritySelector;
pub use task_row::TaskRowView;
pub use task_tree_view::TaskTreeView;
