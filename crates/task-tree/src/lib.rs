//! Task Tree
//!
//! A hierarchical to-do engine: tasks nest into arbitrarily deep subtask
//! forests grouped into named lists. Edits are computed as pure tree
//! transformations, applied to the in-memory store immediately, persisted as a
//! whole-tree replace and rolled back if storage refuses them.
//!
//! Storage and text generation sit behind the traits in [`ports`], so the same
//! engine drives a browser frontend and native tests.

pub mod config;
pub mod coordinator;
pub mod decompose;
pub mod domain;
pub mod ports;
pub mod store;
pub mod tree;

pub use config::TaskTreeConfig;
pub use coordinator::{MutationCoordinator, Notice, NoticeLevel, StoreEvent};
pub use decompose::{DecomposeOutcome, Decomposer};
pub use domain::{FormatError, ListId, ListKind, Priority, TaskError, TaskId, TaskList, TaskNode, TaskResult};
pub use ports::{ListPersistence, PortError, SubtaskGenerator};
pub use store::{ListStore, SessionMode};
