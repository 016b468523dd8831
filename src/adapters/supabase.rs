//! Supabase (PostgREST) store for memos and todos.
//!
//! Thin REST client over the `memos` and `todos` tables. Filters use the
//! PostgREST `column=eq.value` form; every request carries the project API
//! key as both `apikey` and bearer token.

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use crate::domain::{Memo, MemoUpdate, Todo, TodoRecord};

use super::MemoStore;

/// Errors from the backing store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Memo not found: {0}")]
    NotFound(String),

    #[error("Memo {0} does not belong to the configured user")]
    Unauthorized(String),

    #[error("Store API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// REST client for the hosted database
pub struct SupabaseStore {
    base_url: String,
    api_key: String,
    user_id: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    /// Create a new store client. `base_url` is the project URL without a
    /// trailing slash; `user_id` scopes reads and ownership checks.
    pub fn new(base_url: String, api_key: String, user_id: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            user_id,
            client: reqwest::Client::new(),
        }
    }

    /// Build a table URL (`{base}/rest/v1/{table}`)
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Map a non-success response to an API error
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(StoreError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl MemoStore for SupabaseStore {
    async fn get_memo(&self, id: &str) -> Result<Memo, StoreError> {
        let response = self
            .authed(self.client.get(self.table_url("memos")))
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_string())])
            .send()
            .await?;

        let rows: Vec<Memo> = Self::check(response).await?.json().await?;
        let memo = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if memo.user_id != self.user_id {
            return Err(StoreError::Unauthorized(id.to_string()));
        }

        Ok(memo)
    }

    async fn list_memos(&self, limit: usize) -> Result<Vec<Memo>, StoreError> {
        let response = self
            .authed(self.client.get(self.table_url("memos")))
            .query(&[
                ("user_id", format!("eq.{}", self.user_id)),
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_memo(&self, id: &str, update: &MemoUpdate) -> Result<(), StoreError> {
        let response = self
            .authed(self.client.patch(self.table_url("memos")))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(update)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn delete_memo(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .authed(self.client.delete(self.table_url("memos")))
            .query(&[
                ("id", format!("eq.{id}")),
                ("user_id", format!("eq.{}", self.user_id)),
            ])
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn insert_todos(&self, todos: &[TodoRecord]) -> Result<(), StoreError> {
        if todos.is_empty() {
            return Ok(());
        }

        let response = self
            .authed(self.client.post(self.table_url("todos")))
            .header("Prefer", "return=minimal")
            .json(todos)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn todos_for_memo(&self, memo_id: &str) -> Result<Vec<Todo>, StoreError> {
        let response = self
            .authed(self.client.get(self.table_url("todos")))
            .query(&[
                ("memo_id", format!("eq.{memo_id}")),
                ("select", "*".to_string()),
                ("order", "due_date.asc".to_string()),
            ])
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn set_todo_completed(&self, todo_id: &str, completed: bool) -> Result<(), StoreError> {
        let response = self
            .authed(self.client.patch(self.table_url("todos")))
            .query(&[("id", format!("eq.{todo_id}"))])
            .header("Prefer", "return=minimal")
            .json(&json!({ "is_completed": completed }))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn set_todo_due_date(&self, todo_id: &str, due_date: &str) -> Result<(), StoreError> {
        let response = self
            .authed(self.client.patch(self.table_url("todos")))
            .query(&[("id", format!("eq.{todo_id}"))])
            .header("Prefer", "return=minimal")
            .json(&json!({ "due_date": due_date }))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}
