//! LLM driver trait and implementations.
//!
//! The agent talks to an OpenAI-compatible text-completions endpoint
//! (prompt in, generated text out). The [`LlmDriver`] trait is the seam;
//! [`CompletionsDriver`] is the reqwest-backed implementation.

pub mod completions;
pub mod provider;

pub use completions::CompletionsDriver;
pub use provider::Provider;

/// LLM connection and model settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Base URL for the LLM API (e.g. `https://api.friendli.ai/serverless`).
    pub base_url: String,
    /// Optional API key for authentication.
    pub api_key: Option<String>,
    /// Model identifier (e.g. `meta-llama-3.1-8b-instruct`).
    pub model: String,
    /// Provider type, auto-detected from `base_url`.
    pub provider: Provider,
}

/// A single text-completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Fully assembled prompt (system instructions + user turn).
    pub prompt: String,
    /// Generation budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
    /// Stop sequences.
    pub stop: Vec<String>,
}

impl CompletionRequest {
    /// Low-temperature request used for tool selection and extraction.
    #[must_use]
    pub fn deterministic(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: 500,
            temperature: 0.1,
            top_p: 0.9,
            stop: vec!["\n\nUser:".to_string(), "\nUser:".to_string()],
        }
    }

    /// Higher-temperature request used for creative generation.
    #[must_use]
    pub fn creative(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: 300,
            temperature: 0.7,
            top_p: 0.9,
            stop: vec![
                "\n\nUser:".to_string(),
                "\nUser:".to_string(),
                "---".to_string(),
            ],
        }
    }
}

/// Trait for LLM completion drivers.
#[async_trait::async_trait]
pub trait LlmDriver: Send + Sync {
    /// Run a completion and return the generated text.
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured, the request fails, or
    /// the provider rejects it.
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String>;
}
