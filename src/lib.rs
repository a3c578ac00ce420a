//! OpenScript
//!
//! A trend-driven short-form video script assistant. Users chat with an
//! agent that can search trending YouTube videos, transcribe their audio,
//! and generate viral script variants — either one tool at a time or as a
//! fixed multi-step "video idea" pipeline.
//!
//! # Architecture
//!
//! - **Server**: Axum-based HTTP server with a best-effort SSE stream
//! - **Agent**: tool selection via LLM-emitted JSON, plus a fixed pipeline
//!   (search → transcribe → generate → format)
//! - **Services**: YouTube Data API client, yt-dlp + Whisper transcription,
//!   LLM-backed script generation with deterministic fallbacks
//!
//! # Modules
//!
//! - [`agent`]: the orchestrator core
//! - [`llm`]: LLM driver trait and completions implementation
//! - [`trends`]: YouTube trend discovery
//! - [`transcribe`]: audio download and transcription
//! - [`scripts`]: viral script generation
//! - [`session`]: in-memory conversation transcript
//! - [`events`]: streaming event model

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::assigning_clones)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::default_trait_access)]
#![allow(clippy::unused_async)]

pub mod agent;
pub mod chat;
pub mod config;
pub mod events;
pub mod llm;
pub mod scripts;
pub mod server;
pub mod session;
pub mod transcribe;
pub mod trends;

use std::sync::Arc;

use crate::agent::Agent;
use crate::config::AppConfig;
use crate::llm::LlmSettings;
use crate::scripts::ScriptGenerator;
use crate::session::Transcript;
use crate::transcribe::Transcriber;
use crate::trends::TrendsClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The agent orchestrator.
    pub agent: Arc<Agent>,
    /// Process-wide conversation transcript.
    pub transcript: Transcript,
    /// YouTube trend discovery client.
    pub trends: Arc<TrendsClient>,
    /// Audio transcription service.
    pub transcriber: Arc<Transcriber>,
    /// Viral script generator.
    pub scripts: Arc<ScriptGenerator>,
    /// LLM connection settings (used to report configuration errors).
    pub llm_settings: Arc<LlmSettings>,
    /// Global configuration.
    pub config: Arc<AppConfig>,
}
