//! HTTP surface: router, handlers, and the server entry point.
//!
//! Every route is a stateless wrapper around one service call (or the agent
//! itself). Wire field names stay camelCase where the upstream clients
//! expect them.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Query, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio_stream::{StreamExt, wrappers::UnboundedReceiverStream};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::AppState;
use crate::agent::Agent;
use crate::chat;
use crate::config::AppConfig;
use crate::events::{AgentEvent, sse_event};
use crate::llm::{CompletionsDriver, LlmDriver, LlmSettings};
use crate::scripts::{ScriptGenerator, ScriptRequest, Tone};
use crate::session::{AgentMessage, Transcript};
use crate::transcribe::{TranscribeError, Transcriber};
use crate::trends::{TrendingVideo, TrendsClient};

/// Artificial processing delay for the canned chat endpoint.
const CHAT_DELAY: Duration = Duration::from_millis(1500);

/// Start the server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>, settings: LlmSettings) -> anyhow::Result<()> {
    let youtube_api_key = secret_from_env("YOUTUBE_API_KEY");
    let groq_api_key = secret_from_env("GROQ_API_KEY");

    let state = build_state(config.clone(), settings, youtube_api_key, groq_api_key);
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn secret_from_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Wire up services, the agent, and shared state.
#[must_use]
pub fn build_state(
    config: Arc<AppConfig>,
    settings: LlmSettings,
    youtube_api_key: Option<String>,
    groq_api_key: Option<String>,
) -> AppState {
    let llm: Arc<dyn LlmDriver> = Arc::new(CompletionsDriver::new(settings.clone()));
    let trends = Arc::new(TrendsClient::new(youtube_api_key));
    let transcriber = Arc::new(Transcriber::new(groq_api_key));
    let scripts = Arc::new(ScriptGenerator::new(Arc::clone(&llm)));
    let transcript = Transcript::new();

    let agent = Arc::new(Agent::new(
        llm,
        Arc::clone(&trends),
        Arc::clone(&transcriber),
        Arc::clone(&scripts),
        transcript.clone(),
        &config,
    ));

    AppState {
        agent,
        transcript,
        trends,
        transcriber,
        scripts,
        llm_settings: Arc::new(settings),
        config,
    }
}

/// Build the application router.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let timeout_duration = if state.config.resilience.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60) // effectively off
    } else {
        Duration::from_secs(state.config.resilience.request_timeout_secs)
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/agent", post(api_agent).get(api_agent_history))
        .route("/api/agent/stream", get(api_agent_stream))
        .route("/api/chat", post(api_chat))
        .route("/api/trends/search", post(api_trends_search))
        .route("/api/trends/popular", post(api_trends_popular))
        .route("/api/transcribe", post(api_transcribe))
        .route("/api/generate-script", post(api_generate_script))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: axum::middleware::Next| {
                let duration = timeout_duration;
                async move {
                    match tokio::time::timeout(duration, next.run(req)).await {
                        Ok(res) => res,
                        Err(_) => {
                            (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                        }
                    }
                }
            },
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Error plumbing
// ─────────────────────────────────────────────────────────────────────────────

/// JSON error body, `{ "error": "..." }`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

fn bad_request(message: &str) -> ApiError {
    error_response(StatusCode::BAD_REQUEST, message)
}

fn map_trends_error(err: crate::trends::TrendsError, fallback: &str) -> ApiError {
    use crate::trends::TrendsError;

    match &err {
        TrendsError::MissingApiKey => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        TrendsError::Upstream { status, .. } => error_response(
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            err.to_string(),
        ),
        TrendsError::NoSearchResults
        | TrendsError::NoDetails
        | TrendsError::NoPopularResults => error_response(StatusCode::NOT_FOUND, err.to_string()),
        TrendsError::Http(e) => {
            tracing::error!(error = %e, "YouTube request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, fallback)
        }
    }
}

fn map_transcribe_error(err: &TranscribeError) -> ApiError {
    match err {
        TranscribeError::InvalidUrl | TranscribeError::NoVideoId => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        _ => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Agent API
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AgentRequest {
    /// User message (required unless `action` is `clear`).
    #[serde(default)]
    message: Option<String>,
    /// Special action; only `clear` is recognized.
    #[serde(default)]
    action: Option<String>,
}

#[derive(Debug, Serialize)]
struct AgentResponse {
    success: bool,
    responses: Vec<AgentMessage>,
    history: Vec<AgentMessage>,
}

#[derive(Debug, Serialize)]
struct ClearResponse {
    success: bool,
    message: String,
    history: Vec<AgentMessage>,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    success: bool,
    history: Vec<AgentMessage>,
}

/// POST /api/agent - Process a message (or clear the transcript).
async fn api_agent(
    State(state): State<AppState>,
    Json(req): Json<AgentRequest>,
) -> Result<Response, ApiError> {
    if req.action.as_deref() == Some("clear") {
        state.transcript.clear();
        info!(name: "agent.history.cleared", "Conversation history cleared");
        return Ok(Json(ClearResponse {
            success: true,
            message: "Conversation history cleared".to_string(),
            history: Vec::new(),
        })
        .into_response());
    }

    let message = match req.message.as_deref() {
        Some(m) if !m.trim().is_empty() => m.to_string(),
        _ => return Err(bad_request("Message is required")),
    };

    if state.llm_settings.api_key.is_none() {
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "LLM API key not configured. Please add LLM_API_KEY to your environment variables.",
        ));
    }

    info!(message = %message, "Processing agent message");
    let responses = state.agent.process_message(&message).await;
    let history = state.transcript.tail(state.config.pipeline.history_tail);

    Ok(Json(AgentResponse {
        success: true,
        responses,
        history,
    })
    .into_response())
}

/// GET /api/agent - Fetch recent conversation history.
async fn api_agent_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let history = state.transcript.tail(state.config.pipeline.history_tail * 2);
    Json(HistoryResponse {
        success: true,
        history,
    })
}

#[derive(Debug, Deserialize)]
struct AgentStreamQuery {
    #[serde(default)]
    message: Option<String>,
}

/// GET /api/agent/stream - Best-effort SSE: produced messages stream as
/// they are appended.
async fn api_agent_stream(
    State(state): State<AppState>,
    Query(query): Query<AgentStreamQuery>,
) -> Response {
    let Some(message) = query.message.filter(|m| !m.trim().is_empty()) else {
        return single_error_sse("Message is required");
    };

    if state.llm_settings.api_key.is_none() {
        return single_error_sse(
            "LLM API key not configured. Please add LLM_API_KEY to your environment variables.",
        );
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    let _ = tx.send(AgentEvent::StreamStart {
        request_id: request_id.clone(),
    });

    info!(request_id = %request_id, "Starting agent SSE stream");

    let agent = Arc::clone(&state.agent);
    tokio::spawn(async move {
        let _ = agent.process_message_with_events(&message, Some(&tx)).await;
        let _ = tx.send(AgentEvent::Done);
    });

    let stream = UnboundedReceiverStream::new(rx)
        .map(|event| Ok::<String, std::convert::Infallible>(sse_event(&event)));

    build_sse_response(axum::body::Body::from_stream(stream))
}

// ─────────────────────────────────────────────────────────────────────────────
// Canned chat API
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    #[allow(dead_code)]
    role: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    messages: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    message: String,
}

/// POST /api/chat - Canned assistant reply keyed on the last message.
async fn api_chat(Json(req): Json<ChatRequest>) -> Result<Json<ChatResponse>, ApiError> {
    let Some(messages) = req.messages else {
        return Err(bad_request("Messages array is required"));
    };

    // Simulated processing delay to keep the endpoint's perceived behavior.
    tokio::time::sleep(CHAT_DELAY).await;

    let last = messages
        .last()
        .and_then(|m| m.content.as_deref())
        .unwrap_or_default();

    Ok(Json(ChatResponse {
        message: chat::reply(last),
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Trends API
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct VideosResponse {
    videos: Vec<TrendingVideo>,
}

#[derive(Debug, Deserialize)]
struct SearchTrendsRequest {
    #[serde(default)]
    query: Option<String>,
}

/// POST /api/trends/search - Keyword search for trending videos.
async fn api_trends_search(
    State(state): State<AppState>,
    Json(req): Json<SearchTrendsRequest>,
) -> Result<Json<VideosResponse>, ApiError> {
    let Some(query) = req.query.filter(|q| !q.trim().is_empty()) else {
        return Err(bad_request("Query is required"));
    };

    let videos = state.trends.search(&query).await.map_err(|e| {
        map_trends_error(e, "Failed to search YouTube videos. Please try again later.")
    })?;

    Ok(Json(VideosResponse { videos }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PopularTrendsRequest {
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    region_code: Option<String>,
    #[serde(default)]
    max_results: Option<u32>,
}

/// POST /api/trends/popular - Most popular videos for a category/region.
async fn api_trends_popular(
    State(state): State<AppState>,
    Json(req): Json<PopularTrendsRequest>,
) -> Result<Json<VideosResponse>, ApiError> {
    let defaults = &state.config.youtube;
    let category_id = req.category_id.unwrap_or_else(|| defaults.category_id.clone());
    let region_code = req.region_code.unwrap_or_else(|| defaults.region_code.clone());
    let max_results = req.max_results.unwrap_or(defaults.max_results);

    let videos = state
        .trends
        .popular(&category_id, &region_code, max_results)
        .await
        .map_err(|e| {
            map_trends_error(
                e,
                "Failed to fetch popular YouTube videos. Please try again later.",
            )
        })?;

    Ok(Json(VideosResponse { videos }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Transcription API
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranscribeRequest {
    #[serde(default)]
    video_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranscribeResponse {
    transcript: String,
    video_id: String,
    success: bool,
}

/// POST /api/transcribe - Download and transcribe a YouTube video's audio.
async fn api_transcribe(
    State(state): State<AppState>,
    Json(req): Json<TranscribeRequest>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let Some(video_url) = req.video_url.filter(|u| !u.trim().is_empty()) else {
        return Err(bad_request("Video URL is required"));
    };

    let result = state
        .transcriber
        .transcribe_url(&video_url)
        .await
        .map_err(|e| map_transcribe_error(&e))?;

    Ok(Json(TranscribeResponse {
        transcript: result.transcript,
        video_id: result.video_id,
        success: true,
    }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Script generation API
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateScriptRequest {
    #[serde(default)]
    input_text: Option<String>,
    #[serde(default)]
    niche: Option<String>,
    #[serde(default)]
    tone: Option<Tone>,
    #[serde(default)]
    duration: Option<u32>,
}

#[derive(Debug, Serialize)]
struct GenerateScriptResponse {
    script: String,
}

/// POST /api/generate-script - Generate a viral script.
async fn api_generate_script(
    State(state): State<AppState>,
    Json(req): Json<GenerateScriptRequest>,
) -> Result<Json<GenerateScriptResponse>, ApiError> {
    let Some(input_text) = req.input_text.filter(|t| !t.trim().is_empty()) else {
        return Err(bad_request("Input text is required"));
    };

    if state.llm_settings.api_key.is_none() {
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "LLM API key not configured. Please add LLM_API_KEY to your environment variables.",
        ));
    }

    let script = state
        .scripts
        .generate(&ScriptRequest {
            input_text,
            niche: req.niche.unwrap_or_else(|| "general".to_string()),
            tone: req.tone.unwrap_or_default(),
            duration: req.duration.unwrap_or(60),
        })
        .await;

    Ok(Json(GenerateScriptResponse { script }))
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML page
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Self-contained chat page.
async fn index_handler() -> impl IntoResponse {
    Html(html_shell("Chat", CHAT_PAGE))
}

/// Generate the HTML shell for the application.
fn html_shell(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Trend-driven short-form script assistant">
    <title>{title} - OpenScript</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 720px; margin: 0 auto; padding: 1rem; }}
        #messages {{ min-height: 50vh; }}
        .msg {{ margin: 0.5rem 0; padding: 0.6rem 0.9rem; border-radius: 0.75rem; white-space: pre-wrap; }}
        .msg.user {{ background: #e3ecfd; }}
        .msg.assistant {{ background: #f2f2f2; }}
        .msg.tool {{ color: #666; font-size: 0.9rem; font-style: italic; }}
        form {{ display: flex; gap: 0.5rem; }}
        textarea {{ flex: 1; padding: 0.5rem; }}
    </style>
</head>
<body>
    <header>
        <h1>🎬 OpenScript</h1>
        <p>Ask for trending videos, transcriptions, scripts, or full video ideas.</p>
    </header>
    <main>
        {content}
    </main>
</body>
</html>"#
    )
}

/// Chat page content: renders transcript messages and posts to the agent.
const CHAT_PAGE: &str = r#"
    <div id="messages"></div>
    <form id="chat-form">
        <textarea name="message" rows="2" placeholder="e.g. I'm going to San Francisco next week" required></textarea>
        <button type="submit">Send</button>
        <button type="button" id="clear">Clear</button>
    </form>
    <script>
        const messages = document.getElementById('messages');
        const form = document.getElementById('chat-form');

        function render(msg) {
            const div = document.createElement('div');
            div.className = 'msg ' + msg.role;
            div.textContent = msg.content;
            messages.appendChild(div);
            div.scrollIntoView();
        }

        form.addEventListener('submit', async (e) => {
            e.preventDefault();
            const text = form.message.value.trim();
            if (!text) return;
            form.message.value = '';
            render({ role: 'user', content: text });

            // Best-effort streaming; falls back to the POST endpoint.
            if (window.EventSource) {
                const source = new EventSource('/api/agent/stream?message=' + encodeURIComponent(text));
                source.addEventListener('message', (evt) => render(JSON.parse(evt.data).data.message));
                source.addEventListener('error', () => source.close());
                source.addEventListener('done', () => source.close());
                return;
            }

            const resp = await fetch('/api/agent', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ message: text }),
            });
            const body = await resp.json();
            (body.responses || []).forEach(render);
        });

        document.getElementById('clear').addEventListener('click', async () => {
            await fetch('/api/agent', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ action: 'clear' }),
            });
            messages.replaceChildren();
        });
    </script>
"#;

// ─────────────────────────────────────────────────────────────────────────────
// SSE helpers
// ─────────────────────────────────────────────────────────────────────────────

fn single_error_sse(message: &str) -> Response {
    let err = AgentEvent::Error {
        message: message.to_string(),
        code: None,
    };
    let done = AgentEvent::Done;

    let payload = format!("{}{}", sse_event(&err), sse_event(&done));
    build_sse_response(axum::body::Body::from(payload))
}

fn build_sse_response(body: axum::body::Body) -> Response {
    let mut resp = Response::new(body);
    let h = resp.headers_mut();
    h.insert("Content-Type", "text/event-stream".parse().unwrap());
    h.insert("Cache-Control", "no-cache".parse().unwrap());
    h.insert("Connection", "keep-alive".parse().unwrap());
    h.insert("X-Accel-Buffering", "no".parse().unwrap());
    resp
}
