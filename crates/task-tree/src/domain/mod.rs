//! Domain Layer
//!
//! Task lists, task nodes and the error taxonomy shared by every other module.
//! This layer has NO I/O (only serde and uuid for identity/serialization).

mod error;
mod list;
mod task;

pub use error::{FormatError, TaskError, TaskResult};
pub use list::{ListId, ListKind, TaskList};
pub use task::{Priority, TaskId, TaskNode};
