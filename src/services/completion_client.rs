//! Adapter for the text-generation endpoint.
//!
//! Everything that knows about the provider's response envelope lives here.
//! Callers only ever see the generated text as a `String`.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::{Config, GenerationConfig},
    errors::{AppError, AppResult},
};

const TRIED_SHAPES: &[&str] = &[
    "candidates[0].content.parts[].text",
    "candidates[0].text",
    "candidates[0].content.parts[].inlineData.data",
];

/// Single-shot text completion. No streaming, no retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: RequestGenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestGenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl From<&GenerationConfig> for RequestGenerationConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretString,
    generation: GenerationConfig,
}

impl GeminiClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_seconds))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
            generation: config.generation.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: RequestGenerationConfig::from(&self.generation),
        };

        log::debug!(
            "Sending completion request to model {} ({} prompt chars)",
            self.model,
            prompt.len()
        );

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Transport {
                status: None,
                body: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Completion request failed with status {}", status);
            return Err(AppError::Transport {
                status: Some(status.as_u16()),
                body,
            });
        }

        let envelope: Value = response.json().await.map_err(|e| {
            AppError::ResponseShape(format!("response body was not JSON: {}", e.without_url()))
        })?;

        let text = extract_candidate_text(&envelope)?;
        log::debug!("Completion returned {} chars", text.len());
        Ok(text)
    }
}

/// Pulls the generated text out of a generateContent response envelope.
///
/// Error payloads and prompt blocks are reported as `Upstream`, a
/// `MAX_TOKENS` finish as `Truncated`. Text is looked up in the shapes listed
/// in `TRIED_SHAPES`, in that order.
pub fn extract_candidate_text(envelope: &Value) -> AppResult<String> {
    if let Some(error) = envelope.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(AppError::Upstream(message));
    }

    if let Some(reason) = envelope
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        return Err(AppError::Upstream(format!("prompt was blocked ({})", reason)));
    }

    let candidate = envelope.pointer("/candidates/0");
    let finish_reason = candidate
        .and_then(|c| c.get("finishReason"))
        .and_then(Value::as_str);

    if finish_reason == Some("MAX_TOKENS") {
        return Err(AppError::Truncated);
    }

    if let Some(candidate) = candidate {
        if let Some(text) = text_from_parts(candidate) {
            return Ok(text);
        }
        if let Some(text) = candidate
            .get("text")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
        {
            return Ok(text.to_string());
        }
        if let Some(text) = text_from_inline_data(candidate) {
            return Ok(text);
        }
    }

    let mut message = format!("no generated text found (tried {})", TRIED_SHAPES.join(", "));
    if let Some(reason) = finish_reason {
        message.push_str(&format!("; finishReason was {}", reason));
    }
    Err(AppError::ResponseShape(message))
}

fn parts(candidate: &Value) -> impl Iterator<Item = &Value> {
    candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn text_from_parts(candidate: &Value) -> Option<String> {
    let text: String = parts(candidate)
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    (!text.is_empty()).then_some(text)
}

fn text_from_inline_data(candidate: &Value) -> Option<String> {
    let text: String = parts(candidate)
        .filter_map(|part| part.pointer("/inlineData/data").and_then(Value::as_str))
        .filter_map(|data| STANDARD.decode(data).ok())
        .filter_map(|bytes| String::from_utf8(bytes).ok())
        .collect();

    (!text.is_empty()).then_some(text)
}
