//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the store, coordinator and decomposition adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskTreeConfig {
    /// Upper bound (in characters) for task names, list names and AI descriptions
    pub max_name_len: usize,
    /// Re-fetch the user's lists after every committed write instead of
    /// trusting the optimistic value
    pub refetch_after_commit: bool,
    /// Show sample lists to signed-out visitors
    pub preview_lists: bool,
}

impl Default for TaskTreeConfig {
    fn default() -> Self {
        Self {
            max_name_len: 200,
            refetch_after_commit: false,
            preview_lists: true,
        }
    }
}
