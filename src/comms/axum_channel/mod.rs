//! Axum-based HTTP channel — serves the site's JSON API under `/api/`.
//!
//! Implements [`Component`] so it runs alongside the console: `run()` drives
//! the axum event loop and the shared [`CancellationToken`] is wired to
//! axum's graceful shutdown.
//!
//! ## URL layout
//!
//! ```text
//! GET  /api/health
//! POST /api/chat        {"message": "..."}
//! POST /api/chat/reset
//! GET  /api/quiz
//! POST /api/login       {"email": "...", "password": "..."}
//! POST /api/signup      {"name", "email", "password", "confirmPassword", "agreeTerms"}
//! POST /api/logout
//! GET  /api/me
//! GET  /api/dashboard
//! POST /api/contact     {"name", "email", "phone"?, "subject", "message"}
//! ```

mod api;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AppError;

use super::AppState;
use super::runtime::{Component, ComponentFuture};

/// Router state injected into every handler via [`axum::extract::State`].
#[derive(Clone)]
pub(crate) struct AxumState {
    pub channel_id: Arc<str>,
    pub app: Arc<AppState>,
}

pub struct AxumChannel {
    channel_id: String,
    bind_addr: String,
    state: Arc<AppState>,
}

impl AxumChannel {
    pub fn new(channel_id: impl Into<String>, bind_addr: impl Into<String>, state: Arc<AppState>) -> Self {
        Self {
            channel_id: channel_id.into(),
            bind_addr: bind_addr.into(),
            state,
        }
    }
}

impl Component for AxumChannel {
    fn id(&self) -> &str {
        &self.channel_id
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_axum(self.channel_id, self.bind_addr, self.state, shutdown))
    }
}

async fn run_axum(
    channel_id: String,
    bind_addr: String,
    app: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    let router = build_router(AxumState {
        channel_id: Arc::from(channel_id.as_str()),
        app,
    });

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::Comms(format!("axum bind failed on {bind_addr}: {e}")))?;

    info!(%channel_id, %bind_addr, "axum channel listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Comms(format!("axum server error: {e}")))?;

    info!(%channel_id, "axum channel shut down");
    Ok(())
}

pub(crate) fn build_router(state: AxumState) -> Router {
    Router::new()
        .route("/api/health",     get(api::health))
        .route("/api/chat",       post(api::chat))
        .route("/api/chat/reset", post(api::chat_reset))
        .route("/api/quiz",       get(api::quiz))
        .route("/api/login",      post(api::login))
        .route("/api/signup",     post(api::signup))
        .route("/api/logout",     post(api::logout))
        .route("/api/me",         get(api::me))
        .route("/api/dashboard",  get(api::dashboard))
        .route("/api/contact",    post(api::contact))
        .with_state(state)
}
