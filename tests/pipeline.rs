//! Memo Pipeline Integration Tests
//!
//! Runs the pipeline against in-memory fakes to verify persistence order,
//! deadline resolution of stored todos, and the re-processing guard.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::DateTime;
use serde_json::{json, Value};

use memovox::adapters::{Converter, MemoStore, Processor, StoreError};
use memovox::{Memo, MemoPipeline, MemoUpdate, ProcessedMemo, Todo, TodoRecord, NO_DEADLINE};

/// Converter fake that records the input and pretends to transcode
struct FakeConverter;

#[async_trait]
impl Converter for FakeConverter {
    async fn convert(&self, storage_path: &str) -> Result<String> {
        Ok(format!("{storage_path}.mp3"))
    }
}

/// Processor fake returning a canned service response
struct FakeProcessor {
    response: Value,
}

#[async_trait]
impl Processor for FakeProcessor {
    async fn process(&self, _audio_path: &str) -> Result<ProcessedMemo> {
        ProcessedMemo::from_response(&self.response)
    }
}

/// Everything the store fake observed during a run
#[derive(Default)]
struct StoreState {
    ops: Mutex<Vec<&'static str>>,
    updates: Mutex<Vec<MemoUpdate>>,
    todos: Mutex<Vec<TodoRecord>>,
}

struct FakeStore {
    memo: Memo,
    state: Arc<StoreState>,
}

#[async_trait]
impl MemoStore for FakeStore {
    async fn get_memo(&self, _id: &str) -> Result<Memo, StoreError> {
        self.state.ops.lock().unwrap().push("get");
        Ok(self.memo.clone())
    }

    async fn list_memos(&self, _limit: usize) -> Result<Vec<Memo>, StoreError> {
        Ok(Vec::new())
    }

    async fn update_memo(&self, _id: &str, update: &MemoUpdate) -> Result<(), StoreError> {
        self.state.ops.lock().unwrap().push("update");
        self.state.updates.lock().unwrap().push(update.clone());
        Ok(())
    }

    async fn delete_memo(&self, _id: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_todos(&self, todos: &[TodoRecord]) -> Result<(), StoreError> {
        self.state.ops.lock().unwrap().push("insert");
        self.state.todos.lock().unwrap().extend_from_slice(todos);
        Ok(())
    }

    async fn todos_for_memo(&self, _memo_id: &str) -> Result<Vec<Todo>, StoreError> {
        Ok(Vec::new())
    }

    async fn set_todo_completed(&self, _todo_id: &str, _completed: bool) -> Result<(), StoreError> {
        Ok(())
    }

    async fn set_todo_due_date(&self, _todo_id: &str, _due_date: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

fn memo() -> Memo {
    Memo {
        id: "memo-1".to_string(),
        user_id: "user-1".to_string(),
        title: "Monday planning".to_string(),
        storage_path: Some("audio/memo-1.m4a".to_string()),
        transcription: None,
        summary: None,
        created_at: None,
        updated_at: None,
        content: None,
    }
}

fn build_pipeline(
    memo: Memo,
    response: Value,
) -> (
    MemoPipeline<FakeConverter, FakeProcessor, FakeStore>,
    Arc<StoreState>,
) {
    let state = Arc::new(StoreState::default());
    let store = FakeStore {
        memo,
        state: Arc::clone(&state),
    };
    (
        MemoPipeline::new(FakeConverter, FakeProcessor { response }, store),
        state,
    )
}

#[tokio::test]
async fn full_run_persists_results_and_todos() {
    let response = json!({
        "summary": "Plan the week",
        "transcription": "okay so this week...",
        "priority_focus": "Hiring",
        "tasks": [
            { "text": "Call recruiter", "deadline": "tomorrow", "subtasks": ["find number", "schedule"] },
            { "text": "Expense report" }
        ]
    });

    let (pipeline, state) = build_pipeline(memo(), response);
    let outcome = pipeline.process_memo("memo-1", false).await.unwrap();

    assert_eq!(outcome.memo_id, "memo-1");
    assert_eq!(outcome.summary, "Plan the week");
    assert_eq!(outcome.todos_created, 2);
    assert!(outcome.tasks[0].is_priority);
    assert!(!outcome.tasks[1].is_priority);

    // Memo update carries the results plus the content blob
    let updates = state.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].summary, "Plan the week");
    assert_eq!(updates[0].transcription, "okay so this week...");
    let content: Value = serde_json::from_str(&updates[0].content).unwrap();
    assert_eq!(content["priority_focus"], "Hiring");
    assert_eq!(content["tasks"].as_array().unwrap().len(), 2);
    assert!(content["tasks"][0]["isPriority"].as_bool().unwrap());

    // Stored todos carry resolved due dates, never the raw text
    let todos = state.todos.lock().unwrap();
    assert_eq!(todos.len(), 2);
    for todo in todos.iter() {
        assert_eq!(todo.user_id, "user-1");
        assert_eq!(todo.memo_id, "memo-1");
        assert!(!todo.is_completed);
        assert_ne!(todo.due_date, NO_DEADLINE);
        assert!(
            DateTime::parse_from_rfc3339(&todo.due_date).is_ok(),
            "unresolved due date: {}",
            todo.due_date
        );
    }
    assert_eq!(todos[0].title, "Call recruiter");
    assert_eq!(todos[0].description, "find number\n- schedule");
    assert_eq!(todos[1].title, "Expense report");
    assert!(todos[1].description.is_empty());
}

#[tokio::test]
async fn memo_update_happens_before_todo_insertion() {
    let response = json!({
        "summary": "s",
        "tasks": [{ "text": "a" }]
    });

    let (pipeline, state) = build_pipeline(memo(), response);
    pipeline.process_memo("memo-1", false).await.unwrap();

    let ops = state.ops.lock().unwrap();
    assert_eq!(*ops, vec!["get", "update", "insert"]);
}

#[tokio::test]
async fn no_tasks_means_no_todo_insertion() {
    let response = json!({ "summary": "nothing actionable", "tasks": [] });

    let (pipeline, state) = build_pipeline(memo(), response);
    let outcome = pipeline.process_memo("memo-1", false).await.unwrap();

    assert_eq!(outcome.todos_created, 0);
    let ops = state.ops.lock().unwrap();
    assert!(!ops.contains(&"insert"));
}

#[tokio::test]
async fn already_processed_memo_is_refused_without_force() {
    let mut processed = memo();
    processed.summary = Some("already done".to_string());

    let response = json!({ "summary": "s", "tasks": [] });
    let (pipeline, state) = build_pipeline(processed.clone(), response.clone());

    let err = pipeline.process_memo("memo-1", false).await.unwrap_err();
    assert!(err.to_string().contains("already processed"));
    assert!(state.updates.lock().unwrap().is_empty());

    // force bypasses the guard
    let (pipeline, state) = build_pipeline(processed, response);
    pipeline.process_memo("memo-1", true).await.unwrap();
    assert_eq!(state.updates.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn memo_without_audio_is_an_error() {
    let mut no_audio = memo();
    no_audio.storage_path = None;

    let (pipeline, state) = build_pipeline(no_audio, json!({ "summary": "s" }));
    let err = pipeline.process_memo("memo-1", false).await.unwrap_err();

    assert!(err.to_string().contains("no audio"));
    assert!(state.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn processor_failure_leaves_the_store_untouched() {
    // Missing summary makes the processor reject the response
    let (pipeline, state) = build_pipeline(memo(), json!({ "transcription": "..." }));

    let err = pipeline.process_memo("memo-1", false).await.unwrap_err();
    assert!(err.to_string().contains("AI processing failed"));

    let ops = state.ops.lock().unwrap();
    assert_eq!(*ops, vec!["get"]);
}
