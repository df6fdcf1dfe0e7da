//! Process-level errors: anything that stops EcoBot from starting or keeps a
//! channel from running. User-facing failures (bad credentials, invalid
//! forms, an unreachable model) have their own types and never become an
//! `AppError` once the app is up.

use thiserror::Error;

use crate::llm::ProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    /// The persisted user record could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// A channel failed to bind, serve, or read its input.
    #[error("comms error: {0}")]
    Comms(String),

    /// The model client could not be constructed.
    #[error("assistant backend error: {0}")]
    Llm(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let e = AppError::Config("cannot read config/default.toml: not found".into());
        assert_eq!(e.to_string(), "config error: cannot read config/default.toml: not found");

        let e = AppError::Storage("user.json unreadable".into());
        assert!(e.to_string().ends_with("user.json unreadable"));
    }

    #[test]
    fn client_build_failure_converts() {
        fn build() -> Result<(), AppError> {
            Err(ProviderError::Transport("tls backend unavailable".into()))?
        }
        let e = build().unwrap_err();
        assert!(matches!(e, AppError::Llm(ProviderError::Transport(_))));
        assert!(e.to_string().starts_with("assistant backend error"));
    }
}
