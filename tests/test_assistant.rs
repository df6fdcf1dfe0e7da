//! End-to-end assistant behaviour through the public session API.

use tempfile::TempDir;

use ecobot::assistant::quiz::{self, OPTION_COUNT};
use ecobot::assistant::resolver::{self, Category};
use ecobot::assistant::{APOLOGY, AssistantError, ChatSession};
use ecobot::config::{AssistantMode, Config, FallbackPolicy};
use ecobot::llm::ProviderError;

fn assistant_config(mode: AssistantMode, fallback: FallbackPolicy) -> ecobot::config::AssistantConfig {
    let tmp = TempDir::new().unwrap();
    let mut config = Config::test_default(tmp.path()).assistant;
    config.mode = mode;
    config.fallback = fallback;
    config
}

#[tokio::test]
async fn offline_quiz_is_well_formed() {
    let session = ChatSession::from_config(&assistant_config(AssistantMode::Offline, FallbackPolicy::Strict), None).unwrap();
    let questions = session.generate_quiz().await.unwrap();
    assert_eq!(questions.len(), 5);
    for q in &questions {
        assert_eq!(q.options.len(), OPTION_COUNT);
        assert!(q.options.contains(&q.correct_answer));
    }
    assert_eq!(questions, quiz::fixed_quiz());
}

#[tokio::test]
async fn unmatched_prompt_gets_default_reply() {
    let mut session = ChatSession::from_config(&assistant_config(AssistantMode::Auto, FallbackPolicy::Strict), None).unwrap();
    assert_eq!(session.backend(), "offline");
    let reply = session.send_message("Tell me about your company").await.unwrap();
    assert_eq!(reply, resolver::DEFAULT_REPLY);
    assert_eq!(session.history().len(), 2);
}

#[test]
fn rule_order_decides_overlaps() {
    // "hi" is matched as a plain substring, so greeting wins over locations.
    assert_eq!(resolver::classify("which location is closest?"), Category::Greeting);
    assert_eq!(resolver::classify("Is my DATA safe?"), Category::DataSecurity);
    assert_eq!(
        resolver::classify("Generate 5 multiple-choice quiz questions about e-waste recycling."),
        Category::Quiz
    );
}

#[tokio::test]
async fn live_without_key_falls_back_when_permissive() {
    let mut session =
        ChatSession::from_config(&assistant_config(AssistantMode::Live, FallbackPolicy::Permissive), None).unwrap();
    assert_eq!(session.backend(), "gemini");
    let reply = session.send_message("How do I recycle my laptop?").await.unwrap();
    assert_eq!(reply, resolver::RECYCLING_REPLY);
}

#[tokio::test]
async fn live_without_key_surfaces_error_when_strict() {
    let mut session =
        ChatSession::from_config(&assistant_config(AssistantMode::Live, FallbackPolicy::Strict), None).unwrap();
    let err = session.send_message("hello").await.unwrap_err();
    assert!(matches!(err, AssistantError::Unavailable(ProviderError::MissingCredentials)));
    assert!(session.history().is_empty());
    assert_eq!(session.reply_or_apology("hello").await, APOLOGY);
}

/// Serve one Gemini-shaped reply carrying `text`; returns the API base URL and
/// the body of the last request received.
async fn gemini_stand_in(text: String) -> (String, std::sync::Arc<std::sync::Mutex<Option<serde_json::Value>>>) {
    use std::sync::{Arc, Mutex};

    let seen = Arc::new(Mutex::new(None));
    let recorder = seen.clone();
    let reply = serde_json::json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] });
    let app = axum::Router::new().fallback(move |raw: String| {
        let recorder = recorder.clone();
        let reply = reply.clone();
        async move {
            *recorder.lock().unwrap() = serde_json::from_str::<serde_json::Value>(&raw).ok();
            axum::Json(reply)
        }
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{addr}/v1beta"), seen)
}

#[tokio::test]
async fn live_quiz_is_requested_standalone_and_parsed() {
    let fenced = format!("```json\n{}\n```", quiz::fixed_quiz_json());
    let (base, seen) = gemini_stand_in(fenced).await;

    let mut config = assistant_config(AssistantMode::Live, FallbackPolicy::Strict);
    config.gemini.api_base_url = base;
    let session = ChatSession::from_config(&config, Some("test-key".into())).unwrap();

    let questions = session.generate_quiz().await.unwrap();
    assert_eq!(questions, quiz::fixed_quiz());

    let body = seen.lock().unwrap().take().unwrap();
    assert_eq!(body["contents"].as_array().unwrap().len(), 1);
    assert!(body.get("generationConfig").is_none());
    assert!(!body["contents"][0]["parts"][0]["text"].as_str().unwrap().contains("EcoBot"));
}
