//! OpenAI-compatible text-completions driver.

use anyhow::{Context, anyhow};

use super::{CompletionRequest, LlmDriver, LlmSettings};

/// Driver for OpenAI-compatible `/v1/completions` endpoints.
#[derive(Clone)]
pub struct CompletionsDriver {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for CompletionsDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionsDriver")
            .field("settings", &self.settings)
            .finish()
    }
}

impl CompletionsDriver {
    /// Create a new completions driver with the given settings.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait::async_trait]
impl LlmDriver for CompletionsDriver {
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("LLM API key not configured"))?;

        let url = self
            .settings
            .provider
            .build_completions_url(&self.settings.base_url);

        let body = serde_json::json!({
            "model": self.settings.model,
            "prompt": req.prompt,
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
            "top_p": req.top_p,
            "stop": req.stop,
        });

        tracing::debug!(
            url = %url,
            model = %self.settings.model,
            prompt_length = req.prompt.len(),
            "Sending completion request"
        );

        let resp = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("completion request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let detail: serde_json::Value = resp.json().await.unwrap_or_default();
            let message = detail
                .get("message")
                .or_else(|| detail.pointer("/error/message"))
                .and_then(|v| v.as_str())
                .unwrap_or_else(|| status.as_str())
                .to_string();
            return Err(anyhow!("LLM API error: {message}"));
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse completion response")?;

        let text = data
            .pointer("/choices/0/text")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        tracing::debug!(response_length = text.len(), "Completion received");

        Ok(text)
    }
}
