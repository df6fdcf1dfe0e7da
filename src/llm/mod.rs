//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations: the
//! hosted Gemini model and the offline keyword resolver. It is the strategy
//! the assistant session picks at startup.
//!
//! Provider instances are shared immutable capabilities — clone them freely.
//! `complete` continues a conversation; `generate` is a standalone prompt.
//! Both are `async fn` on the enum so callers need no
//! trait-object machinery.

pub mod providers;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ─────────────────────────────────────────────────────────────────────

/// Why a provider call produced no reply. Each cause is its own variant so the
/// session can log and report them separately.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingCredentials,
    #[error("provider request failed: {0}")]
    Transport(String),
    #[error("provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("malformed provider response: {0}")]
    Malformed(String),
    #[error("provider returned no text")]
    EmptyResponse,
}

// ── Conversation types ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a chat conversation. Lives only in session memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, text: text.into() }
    }
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
///
/// Adding a backend = new module + new variant + new `complete` arm.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Gemini(providers::gemini::GeminiProvider),
    Mock(providers::mock::MockProvider),
}

impl LlmProvider {
    /// Send `content` after `history` and return the provider's text reply.
    pub async fn complete(
        &self,
        history: &[ChatMessage],
        content: &str,
    ) -> Result<String, ProviderError> {
        match self {
            LlmProvider::Gemini(p) => p.complete(history, content).await,
            LlmProvider::Mock(p) => p.complete(content).await,
        }
    }

    /// Send a standalone `prompt`: no persona, no history, provider-default
    /// generation settings.
    pub async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        match self {
            LlmProvider::Gemini(p) => p.generate(prompt).await,
            LlmProvider::Mock(p) => p.complete(prompt).await,
        }
    }

    /// Short provider name for logs and health output.
    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::Gemini(_) => "gemini",
            LlmProvider::Mock(_) => "offline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_are_distinct() {
        let missing = ProviderError::MissingCredentials.to_string();
        let transport = ProviderError::Transport("connection refused".into()).to_string();
        let status = ProviderError::Provider { status: 403, message: "denied".into() }.to_string();
        assert!(missing.contains("GEMINI_API_KEY"));
        assert!(transport.contains("connection refused"));
        assert!(status.contains("403"));
        assert!(status.contains("denied"));
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","text":"hi"}"#);
    }

    #[tokio::test]
    async fn mock_variant_dispatches() {
        let p = LlmProvider::Mock(providers::mock::MockProvider::new(std::time::Duration::ZERO));
        assert_eq!(p.name(), "offline");
        let reply = p.complete(&[], "where do I drop off?").await.unwrap();
        assert!(reply.contains("drop-off locations"));
    }
}
