//! Chat-completion API interaction.
//!
//! This module talks to an OpenAI-compatible `/chat/completions` endpoint.
//! Exactly one request is made per call; there is no retry.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait defining async LLM interaction
//! - [`ChatPrompt`]: the system instruction plus user payload for one request
//! - [`OpenAiChat`]: `reqwest` implementation of [`AskAsync`]

use crate::errors::DigestError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Default API root.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for digest generation.
pub const TEMPERATURE: f64 = 0.7;

/// Output token cap for digest generation.
pub const MAX_TOKENS: u32 = 1500;

/// One system instruction and one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

/// Trait for async LLM interaction.
///
/// Implementors send a [`ChatPrompt`] to a model and return the generated
/// text. The summarizer is generic over this trait so tests can stand in a
/// scripted model.
pub trait AskAsync {
    /// Send `prompt` to the model and return its reply text.
    async fn ask(&self, prompt: &ChatPrompt) -> Result<String, DigestError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Chat-completion client holding the API key and model for the process.
#[derive(Clone)]
pub struct OpenAiChat {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiChat {
    pub fn new(api_key: String, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl AskAsync for OpenAiChat {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &ChatPrompt) -> Result<String, DigestError> {
        let t0 = Instant::now();
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = DigestError::from_response("chat completion", response).await;
            warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %err, "API call failed");
            return Err(err);
        }

        let parsed: ChatResponse = response.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(DigestError::EmptyCompletion)?;

        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            chars = text.chars().count(),
            "Completion received"
        );
        Ok(text)
    }
}
