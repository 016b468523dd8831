//! AI processing service client.
//!
//! Sends a converted audio path to the processing endpoint and validates
//! the response: a summary is mandatory, everything else is defaulted. The
//! raw `tasks` array goes straight through task normalization so callers
//! only ever see canonical tasks.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::core::normalize_tasks;
use crate::domain::NormalizedTask;

use super::Processor;

/// Client for the AI processing endpoint
pub struct ProcessorClient {
    endpoint: String,
    token: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRequest<'a> {
    file_path: &'a str,
}

/// Validated result of processing one memo
#[derive(Debug, Clone)]
pub struct ProcessedMemo {
    pub id: String,
    pub timestamp: String,
    pub summary: String,
    pub transcription: String,
    pub tasks: Vec<NormalizedTask>,
    pub priority_focus: String,
}

impl ProcessedMemo {
    /// Validate a raw service response.
    ///
    /// `summary` is the one field the rest of the app cannot do without;
    /// its absence is an error. Missing transcription becomes an empty
    /// string, a missing or malformed `tasks` value becomes an empty batch.
    pub fn from_response(body: &Value) -> Result<Self> {
        let summary = body
            .get("summary")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .context("Processing response is missing a summary")?
            .to_string();

        let transcription = body
            .get("transcription")
            .and_then(Value::as_str)
            .unwrap_or_else(|| {
                tracing::warn!("Transcription missing in response, using empty string");
                ""
            })
            .to_string();

        let tasks = normalize_tasks(body.get("tasks").unwrap_or(&Value::Null));

        let id = body
            .get("id")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("process-{}", Utc::now().timestamp_millis()));

        let timestamp = body
            .get("timestamp")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

        let priority_focus = body
            .get("priority_focus")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            id,
            timestamp,
            summary,
            transcription,
            tasks,
            priority_focus,
        })
    }
}

impl ProcessorClient {
    pub fn new(endpoint: String, token: String) -> Self {
        Self {
            endpoint,
            token,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Processor for ProcessorClient {
    async fn process(&self, audio_path: &str) -> Result<ProcessedMemo> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&ProcessRequest { file_path: audio_path })
            .send()
            .await
            .context("Failed to reach processing service")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Processing service error ({}): {}", status, text);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse processing response")?;

        ProcessedMemo::from_response(&body)
    }
}
