//! memovox - Voice-memo processing pipeline
//!
//! Turns recorded voice memos into transcriptions, summaries, and
//! deadline-resolved todos, backed by a hosted database.
//!
//! # Architecture
//!
//! Processing a memo is a linear pipeline over three external services:
//! - Conversion: uploaded M4A audio → MP3 (best-effort)
//! - AI processing: audio → transcription, summary, raw task list
//! - Store: memos and todos live in a hosted Postgres (PostgREST API)
//!
//! The interesting logic sits between the services: raw AI task output is
//! defensively normalized (missing fields defaulted, first task flagged as
//! priority), and each task's free-text deadline ("tomorrow", "in 3 days",
//! an explicit date) is resolved to an end-of-day timestamp.
//!
//! # Modules
//!
//! - `core`: deadline resolution, task normalization, the memo pipeline
//! - `adapters`: HTTP clients for the external services, behind traits
//! - `domain`: data structures (Memo, NormalizedTask, Todo)
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Process an uploaded memo
//! memovox process <memo-id>
//!
//! # Browse results
//! memovox memos
//! memovox show <memo-id>
//!
//! # Check what a deadline phrase resolves to
//! memovox resolve "in 3 days"
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{
    Converter, ConverterClient, MemoStore, ProcessedMemo, Processor, ProcessorClient, StoreError,
    SupabaseStore,
};
pub use core::{normalize_tasks, resolve_deadline, MemoPipeline, ProcessOutcome, NO_DEADLINE};
pub use domain::{Memo, MemoContent, MemoUpdate, NormalizedTask, Todo, TodoRecord};
