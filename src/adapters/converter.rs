//! Audio conversion service client.
//!
//! Uploaded memos arrive as M4A; the processing endpoint wants MP3. The
//! conversion service takes a storage path and returns the path of the
//! converted file.
//!
//! Conversion is best-effort by contract: any failure (no URL configured,
//! HTTP error, malformed response) logs a warning and hands back the
//! original path so the run can continue on the unconverted audio.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Converter;

/// Client for the audio conversion service
pub struct ConverterClient {
    /// Service URL; `None` disables conversion entirely
    endpoint: Option<String>,
    /// Bearer token (the store API key doubles as service auth)
    token: String,
    /// Owner of the files being converted
    user_id: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertRequest<'a> {
    file_path: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    path: Option<String>,
}

impl ConverterClient {
    /// Create a new client. `endpoint == None` means conversion is skipped.
    pub fn new(endpoint: Option<String>, token: String, user_id: String) -> Self {
        Self {
            endpoint,
            token,
            user_id,
            client: reqwest::Client::new(),
        }
    }

    async fn try_convert(&self, endpoint: &str, storage_path: &str) -> Result<String> {
        let response = self
            .client
            .post(endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&ConvertRequest {
                file_path: storage_path,
                user_id: &self.user_id,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Conversion service error ({}): {}", status, text);
        }

        let body: ConvertResponse = response.json().await?;
        body.path
            .filter(|p| !p.is_empty())
            .ok_or_else(|| anyhow::anyhow!("No converted file path in response"))
    }
}

#[async_trait]
impl Converter for ConverterClient {
    async fn convert(&self, storage_path: &str) -> Result<String> {
        let Some(ref endpoint) = self.endpoint else {
            tracing::warn!("Conversion service not configured, using original audio");
            return Ok(storage_path.to_string());
        };

        match self.try_convert(endpoint, storage_path).await {
            Ok(path) => {
                tracing::debug!(%path, "Audio converted");
                Ok(path)
            }
            Err(e) => {
                tracing::warn!("Audio conversion failed, using original file: {}", e);
                Ok(storage_path.to_string())
            }
        }
    }
}
