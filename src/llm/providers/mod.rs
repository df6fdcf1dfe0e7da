//! LLM provider implementations.
//!
//! `build(config, api_key)` is the factory — called at startup.
//! Adding a new backend = new module + new match arm.

pub mod gemini;
pub mod mock;

use std::time::Duration;

use tracing::info;

use crate::config::{AssistantConfig, AssistantMode};
use crate::llm::{LlmProvider, ProviderError};

/// Construct the primary provider from config and an optional API key.
///
/// `api_key` is sourced from `GEMINI_API_KEY` env (never TOML). In `Live`
/// mode a missing key still yields a Gemini provider; every call then fails
/// with [`ProviderError::MissingCredentials`] and the session's fallback
/// policy decides what the user sees.
pub fn build(config: &AssistantConfig, api_key: Option<String>) -> Result<LlmProvider, ProviderError> {
    match (config.mode, api_key) {
        (AssistantMode::Offline, _) | (AssistantMode::Auto, None) => {
            info!(mode = ?config.mode, "using offline assistant");
            Ok(LlmProvider::Mock(mock::MockProvider::new(config.mock_delay)))
        }
        (AssistantMode::Live | AssistantMode::Auto, api_key) => {
            let g = &config.gemini;
            let p = gemini::GeminiProvider::new(
                g.api_base_url.clone(),
                g.model.clone(),
                g.temperature,
                g.max_output_tokens,
                g.timeout_seconds,
                api_key,
            )?;
            info!(model = %g.model, "using hosted assistant");
            Ok(LlmProvider::Gemini(p))
        }
    }
}

/// The offline provider used when the primary one fails. The failed request
/// already cost the user a round trip, so it answers without delay.
pub fn fallback() -> mock::MockProvider {
    mock::MockProvider::new(Duration::ZERO)
}
