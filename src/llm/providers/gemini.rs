//! Gemini `generateContent` provider.
//!
//! Exposes a single `complete(history, content) -> String` interface matching
//! the rest of the `LlmProvider` abstraction. All Gemini wire types are
//! private to this module — callers never see them.
//!
//! Chat requests carry the persona + knowledge snapshot as their first
//! `user` entry, then the prior conversation, then the new message, with the
//! configured generation limits. Standalone prompts (the quiz) are sent
//! alone with the model's default limits.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::knowledge;
use crate::llm::{ChatMessage, ProviderError, Role};

// ── Public provider ───────────────────────────────────────────────────────────

/// Adapter for the hosted Gemini REST API.
///
/// Constructed once at startup, then cheaply cloned because
/// `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    api_base_url: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    api_key: Option<String>,
}

impl GeminiProvider {
    /// Build a provider from config values and an optional API key.
    ///
    /// A `None` key is accepted here and reported on the first call, so a
    /// misconfigured deployment degrades per the session's fallback policy
    /// instead of failing at startup.
    pub fn new(
        api_base_url: String,
        model: String,
        temperature: f32,
        max_output_tokens: u32,
        timeout_seconds: u64,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, api_base_url, model, temperature, max_output_tokens, api_key })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base_url, self.model)
    }

    /// Continue the conversation. One round trip: no retries, no streaming.
    pub async fn complete(
        &self,
        history: &[ChatMessage],
        content: &str,
    ) -> Result<String, ProviderError> {
        let generation = GenerationConfig {
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        };
        self.send(chat_request(history, content, generation)).await
    }

    /// Send `prompt` on its own: no persona turn, no generation limits.
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.send(prompt_request(prompt)).await
    }

    async fn send(&self, payload: GenerateContentRequest) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingCredentials)?;

        debug!(
            model = %self.model,
            turns = payload.contents.len(),
            limited = payload.generation_config.is_some(),
            "sending Gemini request"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            let json = serde_json::to_string_pretty(&payload)
                .unwrap_or_else(|e| format!("<serialization failed: {e}>"));
            trace!(payload = %json, "full Gemini request payload");
        }

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "Gemini HTTP request failed (transport)");
                ProviderError::Transport(e.to_string())
            })?;

        let response = check_status(response).await?;

        let parsed = response.json::<GenerateContentResponse>().await.map_err(|e| {
            error!(error = %e, "failed to deserialize Gemini response");
            ProviderError::Malformed(e.to_string())
        })?;

        debug!(candidates = parsed.candidates.len(), "received Gemini response");
        extract_text(parsed)
    }
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

// Error envelope used by Google APIs.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

fn text_content(role: &str, text: &str) -> Content {
    Content {
        role: Some(role.to_string()),
        parts: vec![Part { text: Some(text.to_string()) }],
    }
}

fn chat_request(history: &[ChatMessage], content: &str, generation: GenerationConfig) -> GenerateContentRequest {
    let mut contents = Vec::with_capacity(history.len() + 2);
    contents.push(text_content("user", &knowledge::system_prompt()));
    for turn in history {
        let role = match turn.role {
            Role::User => "user",
            Role::Assistant => "model",
        };
        contents.push(text_content(role, &turn.text));
    }
    contents.push(text_content("user", content));

    GenerateContentRequest { contents, generation_config: Some(generation) }
}

fn prompt_request(prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![text_content("user", prompt)],
        generation_config: None,
    }
}

/// Join the text parts of the first candidate. Blank output is an error.
fn extract_text(parsed: GenerateContentResponse) -> Result<String, ProviderError> {
    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(text)
}

/// Consume the response and return it if successful, or a structured error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(env) => match env.error.status {
            Some(s) => format!("{s}: {}", env.error.message),
            None => env.error.message,
        },
        Err(_) => body,
    };

    error!(%status, %message, "Gemini request returned HTTP error");
    Err(ProviderError::Provider { status: status.as_u16(), message })
}
