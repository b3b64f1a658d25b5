//! AI Decomposition Adapter
//!
//! Turns one free-text task description into a parent task with generated
//! subtasks. The generator's text is parsed strictly and validated entry by
//! entry; a bad payload still yields the parent task, with a warning.

use std::rc::Rc;

use log::{debug, info, warn};
use serde_json::Value;

use crate::coordinator::{MutationCoordinator, Notice, StoreEvent};
use crate::domain::{FormatError, ListId, Priority, TaskError, TaskId, TaskNode, TaskResult};
use crate::ports::SubtaskGenerator;

const SUBTASK_PROMPT: &str = "Break the following task down into 5 to 8 concrete, actionable subtasks.\n\
Respond with only a JSON array and no other text. Each element must be an object \
with a \"name\" string and a \"priority\" integer from 0 (none) to 3 (high).\n\
Example: [{\"name\": \"Outline the sections\", \"priority\": 2}]\n\n\
Task: ";

/// Fill the fixed instruction template with a task description
pub fn build_prompt(description: &str) -> String {
    format!("{}{}", SUBTASK_PROMPT, description.trim())
}

/// Remove an optional Markdown code fence (with or without a language tag)
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json"), which ends at a newline or, on a
    // single-line fence, where the payload starts
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse generator output into validated subtasks.
///
/// Malformed elements are skipped; the batch only fails when nothing usable
/// remains.
pub fn parse_subtasks(raw: &str, max_name_len: usize) -> Result<Vec<TaskNode>, FormatError> {
    let value: Value =
        serde_json::from_str(strip_code_fences(raw)).map_err(|e| FormatError::Unparseable(e.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(FormatError::NotAnArray);
    };

    let total = entries.len();
    let subtasks: Vec<TaskNode> = entries.iter().filter_map(|entry| parse_entry(entry, max_name_len)).collect();
    if subtasks.len() < total {
        debug!("Discarded {} malformed subtask entries", total - subtasks.len());
    }
    if subtasks.is_empty() {
        return Err(FormatError::NoValidEntries);
    }
    Ok(subtasks)
}

fn parse_entry(entry: &Value, max_name_len: usize) -> Option<TaskNode> {
    let name = entry.get("name")?.as_str()?;
    let name = TaskNode::validate_name(name, max_name_len).ok()?;
    let level = entry.get("priority")?.as_u64()?;
    let priority = Priority::try_from(u8::try_from(level).ok()?).ok()?;
    Some(TaskNode::new(name).with_priority(priority))
}

/// What a decomposition produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecomposeOutcome {
    pub parent_id: TaskId,
    pub subtask_count: usize,
    /// Set when the payload was unusable and the parent was created bare
    pub degraded: Option<FormatError>,
}

#[derive(Clone)]
pub struct Decomposer {
    coordinator: MutationCoordinator,
    generator: Rc<dyn SubtaskGenerator>,
}

impl Decomposer {
    pub fn new(coordinator: MutationCoordinator, generator: Rc<dyn SubtaskGenerator>) -> Self {
        Self { coordinator, generator }
    }

    /// Generate subtasks for `description` and add the result to a list as
    /// one top-level task, persisted in a single write.
    pub async fn decompose(&self, list_id: &ListId, description: &str) -> TaskResult<DecomposeOutcome> {
        let max_len = self.coordinator.config().max_name_len;
        let name = TaskNode::validate_name(description, max_len)
            .map_err(|e| self.coordinator.reject(Some(list_id), e))?;
        // Fail fast on read-only or unknown lists before spending a generation
        self.coordinator.editable_tasks(list_id)?;

        let raw = self
            .generator
            .generate_subtasks(&build_prompt(&name))
            .await
            .map_err(|e| {
                warn!("Subtask generation for {:?} failed: {}", name, e);
                self.coordinator
                    .reject(Some(list_id), TaskError::Generation(e.to_string()))
            })?;

        let (subtasks, degraded) = match parse_subtasks(&raw, max_len) {
            Ok(subtasks) => (subtasks, None),
            Err(format) => {
                warn!("Unusable subtask payload for {:?}: {}", name, format);
                (Vec::new(), Some(format))
            }
        };

        let parent = TaskNode::new(name).with_subtasks(subtasks);
        let outcome = DecomposeOutcome {
            parent_id: parent.id,
            subtask_count: parent.subtasks.len(),
            degraded,
        };
        self.coordinator.insert_task(list_id, None, parent).await?;

        if let Some(format) = &outcome.degraded {
            self.coordinator.emit(StoreEvent::Notice(Notice::warning(format!(
                "Added the task without subtasks: the AI {}",
                format
            ))));
        } else {
            info!("Added {} generated subtasks to list {}", outcome.subtask_count, list_id);
        }
        Ok(outcome)
    }
}
