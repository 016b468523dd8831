//! Normalization of AI-extracted task batches.
//!
//! The processing service returns a `tasks` array whose items are only
//! loosely shaped: fields may be missing, empty, or the wrong type entirely.
//! Everything here is defensive — one malformed item never aborts the batch,
//! and a non-array `tasks` value is treated as an empty batch.

use chrono::Utc;
use serde_json::Value;

use crate::domain::NormalizedTask;

/// Sentinel stored when a task arrives without a usable deadline. The
/// resolver does not date-parse it and lands on its safe default.
pub const NO_DEADLINE: &str = "No deadline";

/// Normalize a raw `tasks` JSON value into canonical tasks.
///
/// Output preserves input order and length (for array input). The first
/// task in a batch is flagged as the priority; all others are not.
pub fn normalize_tasks(raw: &Value) -> Vec<NormalizedTask> {
    let Some(items) = raw.as_array() else {
        if !raw.is_null() {
            tracing::warn!("Tasks field is not an array, treating as empty");
        }
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| normalize_task(item, index))
        .collect()
}

/// Normalize a single raw task. Position is batch-relative and 0-indexed.
fn normalize_task(item: &Value, index: usize) -> NormalizedTask {
    NormalizedTask {
        id: non_empty_str(item, "id")
            .unwrap_or_else(|| format!("task-{}-{}", index + 1, Utc::now().timestamp_millis())),
        text: non_empty_str(item, "text").unwrap_or_else(|| format!("Task {}", index + 1)),
        deadline: non_empty_str(item, "deadline").unwrap_or_else(|| NO_DEADLINE.to_string()),
        subtasks: string_array(item.get("subtasks")),
        is_priority: index == 0,
    }
}

fn non_empty_str(item: &Value, field: &str) -> Option<String> {
    item.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Accept only an array of strings; any other shape collapses to empty.
fn string_array(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    let strings: Option<Vec<String>> = items
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect();

    match strings {
        Some(subtasks) => subtasks,
        None => {
            tracing::warn!("Subtasks contained non-string entries, dropping");
            Vec::new()
        }
    }
}
