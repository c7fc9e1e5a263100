//! OpenAI-compatible chat client.
//!
//! One client instance lives in the app context and serves both the text
//! tutoring path and the vision path (different model names, same wire
//! format). Every failure mode maps to an [`LlmError`]; callers recover by
//! falling through to the heuristic fallback, so nothing here is fatal.

pub mod prompt;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::analysis::{AnalysisRequest, ComplexityEstimate, DetectedError};
use crate::config::LlmConfig;
use crate::tutor::TutorReply;

/// Extra slack on the outer watchdog so the reqwest-level timeout (which
/// actually cancels the connection) normally fires first.
const WATCHDOG_GRACE: Duration = Duration::from_millis(500);

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured")]
    MissingKey,
    #[error("model call timed out")]
    Timeout,
    #[error("model call failed: {0}")]
    Http(reqwest::Error),
    #[error("model reply unusable: {0}")]
    BadReply(String),
}

impl LlmError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

/// Chat message whose content may be plain text or a multimodal parts array.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: serde_json::Value,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: serde_json::Value::String(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: serde_json::Value::String(content.into()),
        }
    }

    /// User message with arbitrary content parts (used for image input).
    pub fn user_parts(parts: serde_json::Value) -> Self {
        Self {
            role: "user",
            content: parts,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Shared outbound chat client. Present in the app context only when an API
/// key is configured; its absence selects the heuristic-only mode.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    vision_model: String,
    call_timeout: Duration,
}

impl LlmClient {
    /// Build the client, or `None` when no API key is configured.
    pub fn from_config(cfg: &LlmConfig) -> anyhow::Result<Option<Self>> {
        let api_key = match cfg.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Ok(None),
        };

        let call_timeout = Duration::from_millis(cfg.timeout_ms);
        let http = reqwest::Client::builder()
            .timeout(call_timeout)
            .build()?;

        Ok(Some(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: cfg.model.clone(),
            vision_model: cfg.vision_model.clone(),
            call_timeout,
        }))
    }

    pub fn vision_model(&self) -> &str {
        &self.vision_model
    }

    /// One chat completion round-trip; returns the first choice's content.
    ///
    /// Bounded twice: the reqwest client timeout cancels the connection, and
    /// an outer watchdog guarantees the caller gets control back even if the
    /// transport stalls in an unexpected way.
    pub async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let exchange = self.exchange(model, messages, max_tokens);
        match tokio::time::timeout(self.call_timeout + WATCHDOG_GRACE, exchange).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout),
        }
    }

    async fn exchange(
        &self,
        model: &str,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(%model, %url, "calling chat completion");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model,
                messages,
                temperature: 0.7,
                max_tokens,
            })
            .send()
            .await
            .map_err(LlmError::from_reqwest)?
            .error_for_status()
            .map_err(LlmError::from_reqwest)?;

        let parsed: ChatResponse = response.json().await.map_err(LlmError::from_reqwest)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::BadReply("empty completion".to_string()))
    }

    /// The tutoring call: prompt the model with the request plus everything
    /// the local heuristics found, then parse its JSON reply.
    pub async fn ask(
        &self,
        req: &AnalysisRequest,
        errors: &[DetectedError],
        complexity: &ComplexityEstimate,
    ) -> Result<TutorReply, LlmError> {
        let messages = [
            ChatMessage::system(prompt::system_prompt(req)),
            ChatMessage::user(prompt::user_prompt(req, errors, complexity)),
        ];
        let content = self.chat(&self.model, &messages, 900).await?;
        parse_reply(&content)
    }
}

// ─── Reply parsing ────────────────────────────────────────────────────────────

/// Parse a model completion into a [`TutorReply`].
///
/// Models regularly wrap JSON in a markdown fence or lead with a sentence;
/// both are tolerated. Anything that still fails to parse is a `BadReply`,
/// which the route turns into the heuristic fallback.
pub(crate) fn parse_reply(content: &str) -> Result<TutorReply, LlmError> {
    let body = strip_fence(content.trim());

    if let Ok(reply) = serde_json::from_str::<TutorReply>(body) {
        return Ok(reply);
    }

    if let (Some(start), Some(end)) = (body.find('{'), body.rfind('}')) {
        if start < end {
            if let Ok(reply) = serde_json::from_str::<TutorReply>(&body[start..=end]) {
                return Ok(reply);
            }
        }
    }

    Err(LlmError::BadReply(
        "completion was not the expected JSON object".to_string(),
    ))
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json", "python", ...) up to the first newline.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
}
