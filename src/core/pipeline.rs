//! Memo processing pipeline.
//!
//! Coordinates one full run over a memo: fetch, convert audio, process
//! with AI, resolve task deadlines, and persist the results.

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::adapters::{Converter, MemoStore, Processor};
use crate::domain::{MemoContent, MemoUpdate, NormalizedTask, TodoRecord};

use super::deadline::resolve_deadline;

/// Result of processing one memo
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub memo_id: String,
    pub summary: String,
    pub transcription: String,
    pub tasks: Vec<NormalizedTask>,
    pub todos_created: usize,
}

/// Drives a memo through conversion, AI processing, and persistence.
///
/// Generic over the adapter traits so runs can be tested with in-memory
/// fakes.
pub struct MemoPipeline<C, P, S> {
    converter: C,
    processor: P,
    store: S,
}

impl<C, P, S> MemoPipeline<C, P, S>
where
    C: Converter,
    P: Processor,
    S: MemoStore,
{
    pub fn new(converter: C, processor: P, store: S) -> Self {
        Self {
            converter,
            processor,
            store,
        }
    }

    /// Process a memo end to end.
    ///
    /// Refuses to re-process a memo that already has results unless
    /// `force` is set. The memo update is written before todos are
    /// inserted; an update failure leaves the store untouched.
    #[instrument(skip(self), fields(memo_id = %memo_id))]
    pub async fn process_memo(&self, memo_id: &str, force: bool) -> Result<ProcessOutcome> {
        let memo = self.store.get_memo(memo_id).await?;

        let storage_path = memo
            .storage_path
            .as_deref()
            .context("Memo has no audio file to process")?;

        if memo.is_processed() && !force {
            anyhow::bail!("Memo {} is already processed (use force to redo)", memo.id);
        }

        info!("Converting audio");
        let audio_path = self.converter.convert(storage_path).await?;

        info!("Sending audio for AI processing");
        let processed = self
            .processor
            .process(&audio_path)
            .await
            .context("AI processing failed")?;

        // Resolve each task's free-text deadline into a concrete due date
        let todos: Vec<TodoRecord> = processed
            .tasks
            .iter()
            .map(|task| {
                TodoRecord::from_task(
                    task,
                    resolve_deadline(&task.deadline),
                    &memo.user_id,
                    &memo.id,
                )
            })
            .collect();

        let content = MemoContent {
            tasks: processed.tasks.clone(),
            priority_focus: processed.priority_focus.clone(),
            timestamp: processed.timestamp.clone(),
        };

        let update = MemoUpdate {
            transcription: processed.transcription.clone(),
            summary: processed.summary.clone(),
            content: serde_json::to_string(&content)?,
        };

        self.store
            .update_memo(&memo.id, &update)
            .await
            .context("Failed to save processing results")?;

        if !todos.is_empty() {
            self.store
                .insert_todos(&todos)
                .await
                .context("Failed to create todos")?;
        }

        info!(todos = todos.len(), "Memo processed");

        Ok(ProcessOutcome {
            memo_id: memo.id,
            summary: processed.summary,
            transcription: processed.transcription,
            tasks: processed.tasks,
            todos_created: todos.len(),
        })
    }
}
