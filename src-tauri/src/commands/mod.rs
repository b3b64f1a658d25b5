//! Commands Layer
//!
//! Tauri command handlers that bridge frontend to backend services.

mod ai_cmd;
mod list_cmd;
mod session_cmd;

pub use ai_cmd::*;
pub use list_cmd::*;
pub use session_cmd::*;
