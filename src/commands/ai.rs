//! AI Commands

use serde::Serialize;

use super::call;

#[derive(Serialize)]
struct PromptArgs<'a> {
    prompt: &'a str,
}

/// Raw model reply for a subtask prompt
pub async fn generate_subtasks(prompt: &str) -> Result<String, String> {
    call("generate_subtasks", &PromptArgs { prompt }).await
}
