//! Shared state for channels — the capability boundary.
//!
//! Channels receive an `Arc<AppState>` and are restricted to the typed
//! methods below. One chat session and one signed-in user are shared by all
//! channels; concurrent callers are serialised by the mutexes and the last
//! write wins.

use std::time::Duration;

use tokio::sync::Mutex;

use crate::assistant::quiz::QuizQuestion;
use crate::assistant::{AssistantError, ChatSession};
use crate::auth::storage::UserStorage;
use crate::auth::{AuthError, AuthStore, User};
use crate::config::Config;
use crate::error::AppError;
use crate::site::contact::{self, ContactForm, ContactReceipt};
use crate::site::dashboard::{self, Dashboard};
use crate::site::signup::SignupForm;
use crate::site::{FormError, SubmitError};

pub struct AppState {
    /// Fixed at construction; read without touching the session lock.
    backend: &'static str,
    assistant: Mutex<ChatSession>,
    auth: Mutex<AuthStore>,
    contact_delay: Duration,
}

impl AppState {
    pub fn new(assistant: ChatSession, auth: AuthStore, contact_delay: Duration) -> Self {
        Self {
            backend: assistant.backend(),
            assistant: Mutex::new(assistant),
            auth: Mutex::new(auth),
            contact_delay,
        }
    }

    /// Build the assistant and restore the persisted session.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let assistant = ChatSession::from_config(&config.assistant, config.gemini_api_key.clone())?;
        let auth = AuthStore::open(UserStorage::new(&config.data_dir), config.auth.latency);
        let contact_delay = if config.auth.latency.is_zero() {
            Duration::ZERO
        } else {
            contact::SUBMIT_DELAY
        };
        Ok(Self::new(assistant, auth, contact_delay))
    }

    // ── assistant ────────────────────────────────────────────────────────────

    /// Reply to a chat message. Failures come back as the apology text.
    pub async fn chat(&self, text: &str) -> String {
        self.assistant.lock().await.reply_or_apology(text).await
    }

    pub async fn quiz(&self) -> Result<Vec<QuizQuestion>, AssistantError> {
        self.assistant.lock().await.generate_quiz().await
    }

    pub async fn reset_chat(&self) {
        self.assistant.lock().await.reset();
    }

    pub fn assistant_backend(&self) -> &'static str {
        self.backend
    }

    // ── account ──────────────────────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let mut auth = self.auth.lock().await;
        auth.login(email, password).await.cloned()
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<User, SubmitError> {
        let mut auth = self.auth.lock().await;
        form.submit(&mut auth).await.cloned()
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.auth.lock().await.logout()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.auth.lock().await.current_user().cloned()
    }

    pub async fn dashboard(&self) -> Result<Dashboard, AuthError> {
        dashboard::load(&*self.auth.lock().await)
    }

    // ── contact ──────────────────────────────────────────────────────────────

    pub async fn contact(&self, form: &ContactForm) -> Result<ContactReceipt, FormError> {
        form.submit(self.contact_delay).await
    }
}
