//! Chat session façade.
//!
//! The single entry point channels use to talk to the assistant. It owns the
//! conversation history and hides which backend answered:
//!
//! ```text
//! send_message(text)
//!     └── primary.complete(history, text)
//!             ├── Ok(reply)                      → reply
//!             └── Err(e) ── Permissive policy    → offline resolver reply
//!                        └─ Strict policy        → Err(AssistantError)
//! ```
//!
//! One attempt per call; no retries.

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{AssistantConfig, FallbackPolicy};
use crate::knowledge;
use crate::llm::providers::{self, mock::MockProvider};
use crate::llm::{ChatMessage, LlmProvider, ProviderError};

use super::quiz::{self, QuizError, QuizQuestion};

/// Shown to end users when a failure reaches the surface.
pub const APOLOGY: &str =
    "Sorry, I encountered an error connecting to my knowledge base. Please try again later.";

/// Questions requested per quiz.
pub const QUIZ_LENGTH: usize = 5;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant unavailable: {0}")]
    Unavailable(#[from] ProviderError),
    #[error("assistant returned an unusable quiz: {0}")]
    Quiz(#[from] QuizError),
}

pub struct ChatSession {
    primary: LlmProvider,
    fallback: MockProvider,
    policy: FallbackPolicy,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(primary: LlmProvider, fallback: MockProvider, policy: FallbackPolicy) -> Self {
        Self { primary, fallback, policy, history: Vec::new() }
    }

    /// Build the session the configuration asks for. `api_key` comes from
    /// `GEMINI_API_KEY` — never TOML.
    pub fn from_config(config: &AssistantConfig, api_key: Option<String>) -> Result<Self, ProviderError> {
        let primary = providers::build(config, api_key)?;
        Ok(Self::new(primary, providers::fallback(), config.fallback))
    }

    /// Name of the primary backend (`"gemini"` or `"offline"`).
    pub fn backend(&self) -> &'static str {
        self.primary.name()
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Forget the conversation so far.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Send one user message and return the assistant's reply.
    ///
    /// Both turns are appended to the history on success. On a surfaced
    /// failure the history is left as it was.
    pub async fn send_message(&mut self, text: &str) -> Result<String, AssistantError> {
        let reply = self.complete(text, true).await?;
        self.history.push(ChatMessage::user(text));
        self.history.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    /// [`send_message`](Self::send_message), with any surfaced failure
    /// replaced by [`APOLOGY`].
    pub async fn reply_or_apology(&mut self, text: &str) -> String {
        match self.send_message(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "assistant failure surfaced to user");
                APOLOGY.to_string()
            }
        }
    }

    /// Standalone prompt outside the conversation: no persona, no history,
    /// and the history is not updated.
    pub async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        self.complete(prompt, false).await
    }

    /// Ask the backend for a quiz and validate it.
    ///
    /// Under the permissive policy an unusable live quiz is replaced by the
    /// built-in one.
    pub async fn generate_quiz(&self) -> Result<Vec<QuizQuestion>, AssistantError> {
        let reply = self.generate(&knowledge::quiz_request(QUIZ_LENGTH)).await?;
        match quiz::parse_quiz(&reply) {
            Ok(questions) => Ok(questions),
            Err(e) if self.policy == FallbackPolicy::Permissive => {
                warn!(error = %e, backend = self.backend(), "unusable quiz reply, serving built-in quiz");
                Ok(quiz::fixed_quiz())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn complete(&self, text: &str, in_conversation: bool) -> Result<String, AssistantError> {
        let result = if in_conversation {
            self.primary.complete(&self.history, text).await
        } else {
            self.primary.generate(text).await
        };
        match result {
            Ok(reply) => {
                debug!(backend = self.backend(), reply_len = reply.len(), "assistant replied");
                Ok(reply)
            }
            Err(e) => match self.policy {
                FallbackPolicy::Permissive => {
                    warn!(error = %e, backend = self.backend(), "primary backend failed, using offline reply");
                    Ok(self.fallback.complete(text).await?)
                }
                FallbackPolicy::Strict => {
                    warn!(error = %e, backend = self.backend(), "primary backend failed");
                    Err(e.into())
                }
            },
        }
    }
}
