//! Session Commands

use super::{call, NoArgs};

/// Configured user id; `None` means preview mode
pub async fn get_session() -> Result<Option<String>, String> {
    call("get_session", &NoArgs {}).await
}

pub async fn recent_logs() -> Result<Vec<String>, String> {
    call("recent_logs", &NoArgs {}).await
}
