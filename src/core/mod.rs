//! Core processing logic.
//!
//! This module contains:
//! - Deadline: free-text deadline resolution
//! - Normalize: defensive normalization of AI-extracted task batches
//! - Pipeline: end-to-end memo processing

pub mod deadline;
pub mod normalize;
pub mod pipeline;

// Re-export commonly used items
pub use deadline::{resolve_deadline, resolve_deadline_at};
pub use normalize::{normalize_tasks, NO_DEADLINE};
pub use pipeline::{MemoPipeline, ProcessOutcome};
