//! Viral script generation.
//!
//! Builds a structured prompt (hook / main content / call-to-action), asks
//! the LLM, and cleans up the output. Every failure path degrades to a
//! deterministic-shape fallback template so callers always get a script.

use std::sync::{Arc, LazyLock};

use rand::seq::IndexedRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm::{CompletionRequest, LlmDriver};

/// Tone of a generated script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Casual,
    Professional,
    Energetic,
    Educational,
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Casual => "casual",
            Self::Professional => "professional",
            Self::Energetic => "energetic",
            Self::Educational => "educational",
        };
        f.write_str(s)
    }
}

/// A generated short-form video script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoScript {
    pub title: String,
    pub hook: String,
    pub script: String,
    pub cta: String,
    pub reasoning: String,
    pub hashtags: Vec<String>,
}

/// Parameters for one script generation.
#[derive(Debug, Clone)]
pub struct ScriptRequest {
    /// Transcript or content to base the script on.
    pub input_text: String,
    /// Content niche (e.g. tech, fitness, lifestyle).
    pub niche: String,
    pub tone: Tone,
    /// Target duration in seconds.
    pub duration: u32,
}

/// LLM-backed script generator with a deterministic fallback.
#[derive(Clone)]
pub struct ScriptGenerator {
    llm: Arc<dyn LlmDriver>,
}

impl std::fmt::Debug for ScriptGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptGenerator").finish()
    }
}

impl ScriptGenerator {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmDriver>) -> Self {
        Self { llm }
    }

    /// Generate a script, falling back to the template on any failure.
    pub async fn generate(&self, req: &ScriptRequest) -> String {
        match self.try_generate(req).await {
            Ok(script) => script,
            Err(e) => {
                warn!(error = %e, "Script generation failed, using fallback template");
                fallback_script(req)
            }
        }
    }

    /// Generate a script via the LLM; errors propagate to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the LLM call fails or produces empty output.
    pub async fn try_generate(&self, req: &ScriptRequest) -> anyhow::Result<String> {
        let prompt = format!(
            "{}\n\nGenerate a viral script based on the above requirements.\n\nScript:",
            build_prompt(req)
        );

        let raw = self.llm.complete(CompletionRequest::creative(prompt)).await?;
        let script = clean_script(&raw);

        if script.is_empty() {
            anyhow::bail!("LLM produced an empty script");
        }

        Ok(script)
    }
}

/// Build the system prompt for one script generation.
fn build_prompt(req: &ScriptRequest) -> String {
    format!(
        "You are a viral content script writer. Create engaging, short-form video scripts that \
         are optimized for social media platforms like TikTok, Instagram Reels, and YouTube Shorts.\n\
         \n\
         INPUT PARAMETERS:\n\
         - Topic/Content: {input}\n\
         - Niche: {niche}\n\
         - Tone: {tone}\n\
         - Duration: {duration} seconds\n\
         \n\
         REQUIREMENTS:\n\
         1. Start with a powerful hook that grabs attention in the first 3 seconds\n\
         2. Include a clear value proposition or interesting insight\n\
         3. Structure the content for the specified duration\n\
         4. Use the specified tone ({tone})\n\
         5. End with a strong call-to-action\n\
         6. Write in a conversational, engaging style\n\
         7. Include specific actionable content\n\
         \n\
         FORMAT YOUR RESPONSE AS A SCRIPT:\n\
         Hook (0-3s): [Opening line that stops scrolling]\n\
         Main Content: [Core message/value]\n\
         Call-to-Action: [What you want viewers to do]\n\
         \n\
         Keep it concise, punchy, and optimized for the {duration}-second format. Focus on \
         {niche} content with a {tone} tone.",
        input = req.input_text,
        niche = req.niche,
        tone = req.tone,
        duration = req.duration,
    )
}

static SCRIPT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^script:\s*").expect("valid prefix pattern"));
static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank-run pattern"));

/// Strip a leading `Script:` echo and collapse blank runs.
fn clean_script(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_prefix = SCRIPT_PREFIX_RE.replace(trimmed, "");
    BLANK_RUN_RE.replace_all(&without_prefix, "\n\n").to_string()
}

const FALLBACK_HOOKS: [&str; 5] = [
    "Stop scrolling! This will change everything...",
    "You won't believe what I just discovered...",
    "This secret has been hidden for too long...",
    "POV: You're about to learn something incredible...",
    "Wait until you see what happens next...",
];

const FALLBACK_CTAS: [&str; 5] = [
    "Follow for more tips like this!",
    "Save this for later!",
    "Share with someone who needs this!",
    "Comment if this helped you!",
    "Double tap if you agree!",
];

/// Deterministic-shape fallback used when the LLM is unavailable.
#[must_use]
pub fn fallback_script(req: &ScriptRequest) -> String {
    let mut rng = rand::rng();
    let hook = FALLBACK_HOOKS.choose(&mut rng).unwrap_or(&FALLBACK_HOOKS[0]);
    let cta = FALLBACK_CTAS.choose(&mut rng).unwrap_or(&FALLBACK_CTAS[0]);

    let body = if req.duration <= 30 {
        format!(
            "Here's the key insight about {}: it's all about timing and authenticity. This \
             approach works because it connects with your audience on a deeper level.",
            req.input_text
        )
    } else if req.duration <= 60 {
        format!(
            "Let me break down {} for you. First, understand your audience. Second, create \
             valuable content. Third, be consistent. This method has helped thousands of \
             creators grow their following.",
            req.input_text
        )
    } else {
        format!(
            "Everything you need to know about {}. The biggest mistake people make is \
             overthinking it. Here's the step-by-step process: start with research, create \
             authentic content, engage with your community, and stay consistent. The results \
             speak for themselves.",
            req.input_text
        )
    };

    format!("Hook (0-3s): {hook}\n\nMain Content: {body}\n\nCall-to-Action: {cta}")
}
