//! Task and todo types.
//!
//! A `NormalizedTask` is the canonical form of an AI-extracted task; a
//! `TodoRecord` is the row shape the backing store accepts.

use serde::{Deserialize, Serialize};

/// A task with all fields defaulted and exactly one priority flag per batch.
///
/// Produced by [`crate::core::normalize_tasks`]; immutable afterwards.
/// Serializes with the camelCase field names the mobile clients expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTask {
    /// Supplied by the service or synthesized (`task-<n>-<millis>`)
    pub id: String,

    /// Task description (`Task <n>` when the service omitted it)
    pub text: String,

    /// Free-text deadline, or the `"No deadline"` sentinel
    pub deadline: String,

    /// Sub-steps; empty unless the service supplied a proper string list
    pub subtasks: Vec<String>,

    /// True only for the first task of a batch
    pub is_priority: bool,
}

/// A todo row as stored in the `todos` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub user_id: String,
    pub memo_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    pub is_completed: bool,
}

/// A todo row to insert (the store assigns the id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub user_id: String,
    pub memo_id: String,
    pub title: String,
    pub description: String,
    /// Resolved deadline timestamp (RFC 3339)
    pub due_date: String,
    pub is_completed: bool,
}

impl TodoRecord {
    /// Build an insertable row from a normalized task and its resolved
    /// deadline. Subtasks are folded into the description, one per line.
    pub fn from_task(
        task: &NormalizedTask,
        due_date: String,
        user_id: &str,
        memo_id: &str,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            memo_id: memo_id.to_string(),
            title: task.text.clone(),
            description: task.subtasks.join("\n- "),
            due_date,
            is_completed: false,
        }
    }
}
