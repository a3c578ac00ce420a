//! HTTP surface tests against the real router.
//!
//! External services are left unconfigured (no API keys, unreachable LLM),
//! which exercises the validation and degradation paths end to end without
//! touching the network beyond localhost.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{Value, json};

use openscript::AppState;
use openscript::config::AppConfig;
use openscript::llm::{LlmSettings, Provider};
use openscript::server::{build_router, build_state};

/// State with no YouTube/Groq keys and an unreachable LLM endpoint.
fn test_state(llm_key: Option<&str>) -> AppState {
    let config = Arc::new(AppConfig::load_from_args(["openscript"]).expect("default config"));
    let settings = LlmSettings {
        // Nothing listens here; LLM calls fail fast and trigger fallbacks.
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: llm_key.map(ToString::to_string),
        model: "test-model".to_string(),
        provider: Provider::Generic,
    };
    build_state(config, settings, None, None)
}

fn server(llm_key: Option<&str>) -> TestServer {
    TestServer::new(build_router(test_state(llm_key))).expect("test server")
}

#[tokio::test]
async fn clear_works_without_any_keys() {
    let server = server(None);

    let resp = server
        .post("/api/agent")
        .json(&json!({ "action": "clear" }))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["history"], json!([]));
}

#[tokio::test]
async fn agent_requires_a_message() {
    let server = server(Some("key"));

    let resp = server.post("/api/agent").json(&json!({})).await;
    resp.assert_status_bad_request();

    let body: Value = resp.json();
    assert_eq!(body["error"], json!("Message is required"));
}

#[tokio::test]
async fn agent_reports_missing_llm_key() {
    let server = server(None);

    let resp = server
        .post("/api/agent")
        .json(&json!({ "message": "hello" }))
        .await;

    resp.assert_status_internal_server_error();
    let body: Value = resp.json();
    assert!(body["error"].as_str().unwrap().contains("LLM_API_KEY"));
}

#[tokio::test]
async fn agent_degrades_to_chat_fallback_and_keeps_history() {
    let server = server(Some("key"));

    let resp = server
        .post("/api/agent")
        .json(&json!({ "message": "hello" }))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["success"], json!(true));

    let responses = body["responses"].as_array().unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["role"], json!("tool"));
    assert_eq!(responses[1]["role"], json!("assistant"));

    // user + tool + assistant end up in the transcript
    let history = server.get("/api/agent").await;
    history.assert_status_ok();
    let history: Value = history.json();
    assert_eq!(history["history"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn agent_stream_emits_lifecycle_events() {
    let server = server(Some("key"));

    let resp = server
        .get("/api/agent/stream")
        .add_query_param("message", "hello")
        .await;

    resp.assert_status_ok();
    assert_eq!(resp.header("content-type"), "text/event-stream");

    let text = resp.text();
    assert!(text.contains("event: stream.start"));
    assert!(text.contains("event: message"));
    assert!(text.contains("event: done"));
}

#[tokio::test]
async fn agent_stream_requires_a_message() {
    let server = server(Some("key"));

    let resp = server.get("/api/agent/stream").await;

    resp.assert_status_ok();
    let text = resp.text();
    assert!(text.contains("event: error"));
    assert!(text.contains("Message is required"));
}

#[tokio::test]
async fn trends_search_requires_query() {
    let server = server(None);

    let resp = server.post("/api/trends/search").json(&json!({})).await;
    resp.assert_status_bad_request();

    let body: Value = resp.json();
    assert_eq!(body["error"], json!("Query is required"));
}

#[tokio::test]
async fn trends_search_reports_missing_api_key() {
    let server = server(None);

    let resp = server
        .post("/api/trends/search")
        .json(&json!({ "query": "cats" }))
        .await;

    resp.assert_status_internal_server_error();
    let body: Value = resp.json();
    assert!(body["error"].as_str().unwrap().contains("YOUTUBE_API_KEY"));
}

#[tokio::test]
async fn trends_popular_reports_missing_api_key() {
    let server = server(None);

    let resp = server.post("/api/trends/popular").json(&json!({})).await;

    resp.assert_status_internal_server_error();
    let body: Value = resp.json();
    assert!(body["error"].as_str().unwrap().contains("YOUTUBE_API_KEY"));
}

#[tokio::test]
async fn transcribe_requires_url() {
    let server = server(None);

    let resp = server.post("/api/transcribe").json(&json!({})).await;
    resp.assert_status_bad_request();

    let body: Value = resp.json();
    assert_eq!(body["error"], json!("Video URL is required"));
}

#[tokio::test]
async fn transcribe_rejects_non_youtube_url() {
    let server = server(None);

    let resp = server
        .post("/api/transcribe")
        .json(&json!({ "videoUrl": "https://vimeo.com/12345" }))
        .await;

    resp.assert_status_bad_request();
    let body: Value = resp.json();
    assert_eq!(body["error"], json!("Invalid YouTube URL"));
}

#[tokio::test]
async fn transcribe_reports_missing_api_key() {
    let server = server(None);

    let resp = server
        .post("/api/transcribe")
        .json(&json!({ "videoUrl": "https://www.youtube.com/watch?v=dQw4w9WgXcQ" }))
        .await;

    resp.assert_status_internal_server_error();
    let body: Value = resp.json();
    assert!(body["error"].as_str().unwrap().contains("GROQ_API_KEY"));
}

#[tokio::test]
async fn generate_script_requires_input() {
    let server = server(Some("key"));

    let resp = server.post("/api/generate-script").json(&json!({})).await;
    resp.assert_status_bad_request();

    let body: Value = resp.json();
    assert_eq!(body["error"], json!("Input text is required"));
}

#[tokio::test]
async fn generate_script_falls_back_when_llm_unreachable() {
    let server = server(Some("key"));

    let resp = server
        .post("/api/generate-script")
        .json(&json!({
            "inputText": "morning routines",
            "niche": "lifestyle",
            "tone": "casual",
            "duration": 30
        }))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    let script = body["script"].as_str().unwrap();
    assert!(script.contains("Hook (0-3s):"));
    assert!(script.contains("Call-to-Action:"));
}

#[tokio::test]
async fn generate_script_reports_missing_llm_key() {
    let server = server(None);

    let resp = server
        .post("/api/generate-script")
        .json(&json!({ "inputText": "anything" }))
        .await;

    resp.assert_status_internal_server_error();
}

#[tokio::test]
async fn chat_requires_messages_array() {
    let server = server(None);

    let resp = server.post("/api/chat").json(&json!({})).await;
    resp.assert_status_bad_request();

    let body: Value = resp.json();
    assert_eq!(body["error"], json!("Messages array is required"));
}

#[tokio::test]
async fn chat_replies_to_last_message() {
    let server = server(None);

    let resp = server
        .post("/api/chat")
        .json(&json!({
            "messages": [
                { "role": "user", "content": "ignore me" },
                { "role": "user", "content": "give me a strong hook" }
            ]
        }))
        .await;

    resp.assert_status_ok();
    let body: Value = resp.json();
    assert!(body["message"].as_str().unwrap().contains("Hooks"));
}

#[tokio::test]
async fn index_serves_chat_page() {
    let server = server(None);

    let resp = server.get("/").await;
    resp.assert_status_ok();
    assert!(resp.text().contains("OpenScript"));
}
