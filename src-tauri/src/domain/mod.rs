//! Domain Layer
//!
//! Backend errors and the stored shape of a task list. Task trees themselves
//! are the shared `task_tree` types.

mod error;
mod list_record;

pub use error::{DomainError, DomainResult};
pub use list_record::ListRecord;
