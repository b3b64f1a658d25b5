//! Frontend Models
//!
//! Task data comes straight from the shared engine crate; only UI-specific
//! shapes live here.

pub use task_tree::{ListId, NoticeLevel, Priority, TaskId, TaskList, TaskNode};

/// A notice shown in the notice bar until dismissed or expired
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeEntry {
    pub id: u32,
    pub level: NoticeLevel,
    pub message: String,
}

impl NoticeEntry {
    pub fn css_class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Info => "notice info",
            NoticeLevel::Warning => "notice warning",
            NoticeLevel::Error => "notice error",
        }
    }
}
