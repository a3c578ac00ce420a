//! Provider-specific configuration and detection.
//!
//! This module handles differences between LLM API providers, mainly URL
//! patterns for their OpenAI-compatible completions endpoints.

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Friendli serverless inference (api.friendli.ai)
    Friendli,
    /// Groq (groq.com)
    Groq,
    /// Together AI (together.ai, together.xyz)
    TogetherAI,
    /// Generic OpenAI-compatible provider
    Generic,
}

impl Provider {
    /// Detect provider from base URL.
    #[must_use]
    pub fn detect_from_url(base_url: &str) -> Self {
        let lower = base_url.to_lowercase();

        if lower.contains("friendli.ai") {
            Self::Friendli
        } else if lower.contains("groq.com") {
            Self::Groq
        } else if lower.contains("together.ai") || lower.contains("together.xyz") {
            Self::TogetherAI
        } else {
            Self::Generic
        }
    }

    /// Build the completions URL for this provider.
    ///
    /// Groq mounts its OpenAI-compatible surface under `/openai`; everyone
    /// else serves `/v1/completions` directly off the base.
    #[must_use]
    pub fn build_completions_url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');

        match self {
            Self::Groq if !base.ends_with("/openai") => {
                format!("{base}/openai/v1/completions")
            }
            _ => format!("{base}/v1/completions"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_friendli() {
        let provider = Provider::detect_from_url("https://api.friendli.ai/serverless");
        assert_eq!(provider, Provider::Friendli);
    }

    #[test]
    fn test_detect_groq() {
        let provider = Provider::detect_from_url("https://api.groq.com");
        assert_eq!(provider, Provider::Groq);
    }

    #[test]
    fn test_detect_generic() {
        let provider = Provider::detect_from_url("http://localhost:8080");
        assert_eq!(provider, Provider::Generic);
    }

    #[test]
    fn test_build_url_friendli() {
        let provider = Provider::Friendli;
        let url = provider.build_completions_url("https://api.friendli.ai/serverless/");
        assert_eq!(url, "https://api.friendli.ai/serverless/v1/completions");
    }

    #[test]
    fn test_build_url_groq() {
        let provider = Provider::Groq;
        let url = provider.build_completions_url("https://api.groq.com");
        assert_eq!(url, "https://api.groq.com/openai/v1/completions");
    }

    #[test]
    fn test_build_url_groq_with_openai_suffix() {
        let provider = Provider::Groq;
        let url = provider.build_completions_url("https://api.groq.com/openai");
        assert_eq!(url, "https://api.groq.com/openai/v1/completions");
    }
}
