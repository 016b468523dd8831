//! Domain types for memovox.
//!
//! This module contains the core data structures:
//! - Memo: a recorded note and its processing results
//! - NormalizedTask: canonical form of an AI-extracted task
//! - Todo/TodoRecord: stored and insertable todo rows

pub mod memo;
pub mod task;

// Re-export commonly used types
pub use memo::{Memo, MemoContent, MemoUpdate};
pub use task::{NormalizedTask, Todo, TodoRecord};
