//! Minimal Groq client (OpenAI-compatible chat.completions).
//!
//! One non-streaming call per hint. Calls are instrumented and log model name,
//! latency and response size, never the API key or the prompt contents.

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::GroqSettings;

/// Why a chat completion didn't yield usable text.
#[derive(Debug, Error)]
pub enum ModelFailure {
  #[error("no usable GROQ_API_KEY configured")]
  MissingCredential,
  #[error("request to Groq failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("Groq HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("Groq response carried no message content")]
  EmptyResponse,
}

impl ModelFailure {
  /// Operator-facing explanation for the statuses worth telling apart.
  pub fn diagnosis(&self) -> Option<&'static str> {
    match self {
      ModelFailure::Status { status: 400, .. } => Some("Bad Request - check model name and request format"),
      ModelFailure::Status { status: 401, .. } => Some("Unauthorized - check GROQ_API_KEY"),
      ModelFailure::Status { status: 429, .. } => Some("Rate limit exceeded"),
      _ => None,
    }
  }
}

#[derive(Clone)]
pub struct GroqClient {
  client: reqwest::Client,
  api_key: String,
  pub api_url: String,
  pub model: String,
  pub max_tokens: u32,
  pub temperature: f32,
  pub top_p: f32,
}

impl GroqClient {
  /// Construct the client if a usable key is configured; otherwise `MissingCredential`.
  pub fn from_settings(settings: &GroqSettings) -> Result<Self, ModelFailure> {
    let api_key = settings.api_key.clone().ok_or(ModelFailure::MissingCredential)?;
    let client = reqwest::Client::builder().timeout(settings.timeout).build()?;

    Ok(Self {
      client,
      api_key,
      api_url: settings.api_url.clone(),
      model: settings.model.clone(),
      max_tokens: settings.max_tokens,
      temperature: settings.temperature,
      top_p: settings.top_p,
    })
  }

  /// Plain-text chat completion; returns the first choice's content, trimmed.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model, user_len = user.len()))]
  pub async fn chat_plain(&self, system: &str, user: &str) -> Result<String, ModelFailure> {
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      max_tokens: self.max_tokens,
      temperature: self.temperature,
      top_p: self.top_p,
      stream: false,
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&self.api_url)
      .header(USER_AGENT, "leetcode-mentor/0.1")
      .header(CONTENT_TYPE, "application/json")
      .bearer_auth(&self.api_key)
      .json(&req).send().await?;

    let status = res.status();
    info!(status = status.as_u16(), elapsed = ?start.elapsed(), "Groq response received");
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      let message = extract_api_error(&body).unwrap_or(body);
      return Err(ModelFailure::Status { status: status.as_u16(), message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "Groq usage");
    }

    body.choices.into_iter().next()
      .and_then(|c| c.message.content)
      .map(|t| t.trim().to_string())
      .filter(|t| !t.is_empty())
      .ok_or(ModelFailure::EmptyResponse)
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  max_tokens: u32,
  temperature: f32,
  top_p: f32,
  stream: bool,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  #[serde(default)] choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { #[serde(default)] content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an OpenAI-style error body.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
