//! Mock account backend.
//!
//! There is no server: login accepts one demo credential pair, signup accepts
//! any complete form, and the signed-in user lives in a single persisted
//! record ([`storage::UserStorage`]). Both calls wait a simulated round-trip
//! latency before answering. Passwords are compared in plain text and never
//! stored. This is a placeholder, not a security boundary.
//!
//! ```text
//! anonymous ──login/signup ok──▶ authenticated ──logout──▶ anonymous
//! ```
//!
//! Every transition writes the record before updating memory, so the two
//! never disagree once a call returns.

pub mod storage;

use std::time::Duration;

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use storage::UserStorage;

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_NAME: &str = "Demo User";
const DEMO_ID: &str = "1";

const USER_ID_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Messages are shown to the user verbatim.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Please log in to continue")]
    NotAuthenticated,
    #[error("An error occurred while saving your session: {0}")]
    Storage(String),
}

pub struct AuthStore {
    storage: UserStorage,
    latency: Duration,
    user: Option<User>,
}

impl AuthStore {
    /// Restore whatever session was persisted. An unreadable record is
    /// logged and treated as anonymous.
    pub fn open(storage: UserStorage, latency: Duration) -> Self {
        let user = match storage.load() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable user record");
                None
            }
        };
        if let Some(u) = &user {
            info!(email = %u.email, "restored session");
        }
        Self { storage, latency, user }
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The signed-in user, or [`AuthError::NotAuthenticated`].
    pub fn require_user(&self) -> Result<&User, AuthError> {
        self.user.as_ref().ok_or(AuthError::NotAuthenticated)
    }

    /// Succeeds only for the demo credentials.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, AuthError> {
        self.simulate_latency().await;

        if email != DEMO_EMAIL || password != DEMO_PASSWORD {
            info!(%email, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let user = User {
            id: DEMO_ID.to_string(),
            name: DEMO_NAME.to_string(),
            email: email.to_string(),
        };
        info!(%email, "login succeeded");
        self.sign_in(user)
    }

    /// Succeeds whenever all three fields are non-empty.
    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> Result<&User, AuthError> {
        self.simulate_latency().await;

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let user = User {
            id: random_user_id(),
            name: name.to_string(),
            email: email.to_string(),
        };
        info!(%email, id = %user.id, "signup succeeded");
        self.sign_in(user)
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.storage
            .clear()
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        if let Some(u) = self.user.take() {
            info!(email = %u.email, "logged out");
        }
        Ok(())
    }

    fn sign_in(&mut self, user: User) -> Result<&User, AuthError> {
        self.storage
            .save(&user)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        let user = self.user.insert(user);
        Ok(&*user)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Nine random base-36 characters.
fn random_user_id() -> String {
    (0..USER_ID_LEN)
        .map(|_| BASE36[(OsRng.next_u32() % 36) as usize] as char)
        .collect()
}
