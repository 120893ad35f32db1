use anyhow::{Context, Result};
use chronos_core::ConversationHistory;
use reqwest::Client;
use thiserror::Error;

use crate::config::CompletionConfig;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("no completion service is configured")]
    NotConfigured,
    #[error("completion request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("completion service answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion body could not be parsed: {0}")]
    MalformedBody(String),
    #[error("completion text missing")]
    EmptyCompletion,
}

impl CompletionError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::MalformedBody(_) => "malformed_body",
            Self::EmptyCompletion => "empty_completion",
        }
    }
}

/// Produces the next assistant message for a role-tagged history.
pub trait CompletionBackend: Send + Sync {
    fn mode(&self) -> &'static str;

    async fn complete(&self, history: &ConversationHistory) -> Result<String, CompletionError>;
}

/// Used when no credential is configured: every call is `NotConfigured`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineCompletion;

impl CompletionBackend for OfflineCompletion {
    fn mode(&self) -> &'static str {
        "offline"
    }

    async fn complete(&self, _history: &ConversationHistory) -> Result<String, CompletionError> {
        Err(CompletionError::NotConfigured)
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiCompletion {
    client: Client,
    config: CompletionConfig,
}

impl OpenAiCompletion {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .context("failed to build completion http client")?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    fn payload(&self, history: &ConversationHistory) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": history.entries(),
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        })
    }
}

impl CompletionBackend for OpenAiCompletion {
    fn mode(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, history: &ConversationHistory) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(self.config.endpoint.as_str())
            .bearer_auth(self.config.api_key.as_str())
            .json(&self.payload(history))
            .send()
            .await
            .map_err(CompletionError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await.map_err(CompletionError::Transport)?;
        let body: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|err| CompletionError::MalformedBody(err.to_string()))?;
        extract_completion_text(&body)
            .filter(|value| !value.trim().is_empty())
            .ok_or(CompletionError::EmptyCompletion)
    }
}

/// Reads `choices[0].message.content`, or a top-level `output_text`.
pub fn extract_completion_text(payload: &serde_json::Value) -> Option<String> {
    if let Some(content) = payload
        .pointer("/choices/0/message/content")
        .and_then(|value| value.as_str())
    {
        return Some(content.to_string());
    }
    payload
        .get("output_text")
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

/// The backend chosen at startup.
#[derive(Debug, Clone)]
pub enum CompletionService {
    Offline(OfflineCompletion),
    OpenAi(OpenAiCompletion),
}

impl CompletionService {
    pub fn from_config(config: Option<CompletionConfig>) -> Result<Self> {
        match config {
            Some(config) => Ok(Self::OpenAi(OpenAiCompletion::new(config)?)),
            None => Ok(Self::Offline(OfflineCompletion)),
        }
    }

    pub fn offline() -> Self {
        Self::Offline(OfflineCompletion)
    }
}

impl CompletionBackend for CompletionService {
    fn mode(&self) -> &'static str {
        match self {
            Self::Offline(backend) => backend.mode(),
            Self::OpenAi(backend) => backend.mode(),
        }
    }

    async fn complete(&self, history: &ConversationHistory) -> Result<String, CompletionError> {
        match self {
            Self::Offline(backend) => backend.complete(history).await,
            Self::OpenAi(backend) => backend.complete(history).await,
        }
    }
}
