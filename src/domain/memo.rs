//! Memo types.
//!
//! A memo is one recorded note: the uploaded audio plus the results of
//! processing it (transcription, summary, extracted tasks).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::NormalizedTask;

/// A memo row as stored in the `memos` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memo {
    pub id: String,
    pub user_id: String,
    pub title: String,

    /// Storage path of the uploaded audio file (absent until upload finishes)
    #[serde(default)]
    pub storage_path: Option<String>,

    #[serde(default)]
    pub transcription: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// JSON blob of the full processing result (see [`MemoContent`])
    #[serde(default)]
    pub content: Option<String>,
}

impl Memo {
    /// A memo is processed once it carries a transcription or summary.
    pub fn is_processed(&self) -> bool {
        self.transcription.as_deref().is_some_and(|s| !s.is_empty())
            || self.summary.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Fields written back to a memo after processing.
#[derive(Debug, Clone, Serialize)]
pub struct MemoUpdate {
    pub transcription: String,
    pub summary: String,
    pub content: String,
}

/// The structured part of a processing result, serialized into
/// [`Memo::content`] so the detail screens can re-render tasks without
/// re-querying the todos table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoContent {
    pub tasks: Vec<NormalizedTask>,
    pub priority_focus: String,
    pub timestamp: String,
}
