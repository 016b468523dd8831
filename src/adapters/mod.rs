//! Adapter interfaces for external systems.
//!
//! Adapters provide a unified interface for the three services a memo run
//! touches: the audio conversion service, the AI processing endpoint, and
//! the hosted database. Each is behind a trait so the pipeline can be
//! exercised without a network.

pub mod converter;
pub mod processor;
pub mod supabase;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{Memo, MemoUpdate, Todo, TodoRecord};

// Re-export the concrete clients
pub use converter::ConverterClient;
pub use processor::{ProcessedMemo, ProcessorClient};
pub use supabase::{StoreError, SupabaseStore};

/// Audio format conversion.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Convert uploaded audio into a processing-friendly format, returning
    /// the storage path of the converted file. Best-effort: implementations
    /// fall back to the original path instead of failing the run.
    async fn convert(&self, storage_path: &str) -> Result<String>;
}

/// AI transcription / summarization / task extraction.
#[async_trait]
pub trait Processor: Send + Sync {
    /// Process the audio at `audio_path` and return the validated result.
    async fn process(&self, audio_path: &str) -> Result<ProcessedMemo>;
}

/// Persistence for memos and their extracted todos.
#[async_trait]
pub trait MemoStore: Send + Sync {
    async fn get_memo(&self, id: &str) -> Result<Memo, StoreError>;

    /// Most recent first.
    async fn list_memos(&self, limit: usize) -> Result<Vec<Memo>, StoreError>;

    async fn update_memo(&self, id: &str, update: &MemoUpdate) -> Result<(), StoreError>;

    async fn delete_memo(&self, id: &str) -> Result<(), StoreError>;

    async fn insert_todos(&self, todos: &[TodoRecord]) -> Result<(), StoreError>;

    async fn todos_for_memo(&self, memo_id: &str) -> Result<Vec<Todo>, StoreError>;

    async fn set_todo_completed(&self, todo_id: &str, completed: bool) -> Result<(), StoreError>;

    async fn set_todo_due_date(&self, todo_id: &str, due_date: &str) -> Result<(), StoreError>;
}
