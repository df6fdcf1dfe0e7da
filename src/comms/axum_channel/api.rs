//! Axum handlers for `/api/*` routes.
//!
//! Each handler receives [`AxumState`] via [`axum::extract::State`] and
//! returns an axum [`Response`]. Errors use the body
//! `{"error": code, "message": text}` where `message` is the text the site
//! shows inline.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::AuthError;
use crate::site::contact::ContactForm;
use crate::site::signup::SignupForm;
use crate::site::{FormError, SubmitError};

use super::AxumState;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct ChatRequest {
    message: String,
}

#[derive(Deserialize)]
pub(super) struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
fn json_error(code: &str, msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": code, "message": format!("{msg}") }))
}

fn auth_error(channel_id: &str, e: AuthError) -> Response {
    match e {
        AuthError::Storage(_) => {
            warn!(%channel_id, "account storage failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, json_error("storage", e)).into_response()
        }
        AuthError::MissingFields => (StatusCode::UNPROCESSABLE_ENTITY, json_error("invalid", e)).into_response(),
        AuthError::InvalidCredentials | AuthError::NotAuthenticated => {
            (StatusCode::UNAUTHORIZED, json_error("unauthorized", e)).into_response()
        }
    }
}

fn form_error(e: FormError) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, json_error("invalid", e)).into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /api/health
pub(super) async fn health(State(state): State<AxumState>) -> Response {
    let body = json!({
        "status": "ok",
        "assistant": state.app.assistant_backend(),
        "authenticated": state.app.current_user().await.is_some(),
    });
    (StatusCode::OK, Json(body)).into_response()
}

/// POST /api/chat — always answers; failures become the apology text.
pub(super) async fn chat(State(state): State<AxumState>, Json(req): Json<ChatRequest>) -> Response {
    debug!(channel_id = %state.channel_id, message_len = req.message.len(), "chat request");
    let reply = state.app.chat(&req.message).await;
    (StatusCode::OK, Json(json!({ "reply": reply }))).into_response()
}

/// POST /api/chat/reset
pub(super) async fn chat_reset(State(state): State<AxumState>) -> Response {
    state.app.reset_chat().await;
    StatusCode::NO_CONTENT.into_response()
}

/// GET /api/quiz
pub(super) async fn quiz(State(state): State<AxumState>) -> Response {
    match state.app.quiz().await {
        Ok(questions) => (StatusCode::OK, Json(questions)).into_response(),
        Err(e) => {
            warn!(channel_id = %state.channel_id, "quiz generation failed: {e}");
            (StatusCode::BAD_GATEWAY, json_error("assistant", crate::assistant::APOLOGY)).into_response()
        }
    }
}

/// POST /api/login
pub(super) async fn login(State(state): State<AxumState>, Json(req): Json<LoginRequest>) -> Response {
    match state.app.login(&req.email, &req.password).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => auth_error(&state.channel_id, e),
    }
}

/// POST /api/signup
pub(super) async fn signup(State(state): State<AxumState>, Json(form): Json<SignupForm>) -> Response {
    match state.app.signup(&form).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(SubmitError::Form(e)) => form_error(e),
        Err(SubmitError::Auth(e)) => auth_error(&state.channel_id, e),
    }
}

/// POST /api/logout
pub(super) async fn logout(State(state): State<AxumState>) -> Response {
    match state.app.logout().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => auth_error(&state.channel_id, e),
    }
}

/// GET /api/me
pub(super) async fn me(State(state): State<AxumState>) -> Response {
    match state.app.current_user().await {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => auth_error(&state.channel_id, AuthError::NotAuthenticated),
    }
}

/// GET /api/dashboard
pub(super) async fn dashboard(State(state): State<AxumState>) -> Response {
    match state.app.dashboard().await {
        Ok(d) => (StatusCode::OK, Json(d)).into_response(),
        Err(e) => auth_error(&state.channel_id, e),
    }
}

/// POST /api/contact
pub(super) async fn contact(State(state): State<AxumState>, Json(form): Json<ContactForm>) -> Response {
    match state.app.contact(&form).await {
        Ok(receipt) => (StatusCode::OK, Json(receipt)).into_response(),
        Err(e) => form_error(e),
    }
}
