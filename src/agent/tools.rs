//! Tool call schema and lenient parsing.
//!
//! The LLM is asked to answer with a single JSON object tagged by `tool`.
//! Models wrap JSON in prose often enough that parsing extracts the
//! outermost braces first; anything unparseable degrades to a canned
//! `chat_response` rather than an error.

use serde::{Deserialize, Serialize};

use crate::scripts::Tone;

/// Canned reply used when tool selection fails.
pub const FALLBACK_HELP: &str = "I'd be happy to help you with viral video content creation! \
You can ask me to find trending videos, transcribe content, or generate scripts.";

/// Which kind of YouTube lookup a search runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Keyword search.
    #[default]
    Search,
    /// `mostPopular` chart.
    Popular,
}

/// A tool call selected by the LLM.
///
/// Field names follow the wire schema the model is prompted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolCall {
    /// Search for trending YouTube videos.
    YoutubeSearch {
        query: String,
        #[serde(rename = "type", default)]
        kind: SearchKind,
    },
    /// Transcribe audio from a YouTube video URL.
    TranscribeVideo {
        #[serde(rename = "videoUrl")]
        video_url: String,
        #[serde(rename = "videoTitle", default, skip_serializing_if = "Option::is_none")]
        video_title: Option<String>,
    },
    /// Generate a viral script from content.
    GenerateScript {
        #[serde(rename = "inputText")]
        input_text: String,
        #[serde(default = "default_niche")]
        niche: String,
        #[serde(default)]
        tone: Tone,
        #[serde(default = "default_duration")]
        duration: u32,
    },
    /// Respond directly without using a tool.
    ChatResponse { message: String },
    /// Run the full video-idea workflow.
    CreateVideoIdea {
        topic: String,
        #[serde(default)]
        context: String,
        #[serde(rename = "userIntent", default)]
        user_intent: String,
    },
}

fn default_niche() -> String {
    "general".to_string()
}

fn default_duration() -> u32 {
    60
}

impl ToolCall {
    /// Wire name of the tool.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::YoutubeSearch { .. } => "youtube_search",
            Self::TranscribeVideo { .. } => "transcribe_video",
            Self::GenerateScript { .. } => "generate_script",
            Self::ChatResponse { .. } => "chat_response",
            Self::CreateVideoIdea { .. } => "create_video_idea",
        }
    }
}

/// Slice out the outermost `{...}` of a model response.
#[must_use]
pub fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Parse a model response into a tool call, if it contains one.
#[must_use]
pub fn parse_tool_call(raw: &str) -> Option<ToolCall> {
    let json = extract_json(raw)?;
    match serde_json::from_str(json) {
        Ok(call) => Some(call),
        Err(e) => {
            tracing::warn!(error = %e, "Tool call did not match any schema");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_youtube_search() {
        let raw = r#"{"tool": "youtube_search", "query": "san francisco", "type": "popular"}"#;
        let call = parse_tool_call(raw).unwrap();
        assert_eq!(
            call,
            ToolCall::YoutubeSearch {
                query: "san francisco".to_string(),
                kind: SearchKind::Popular,
            }
        );
    }

    #[test]
    fn test_parse_defaults_search_kind() {
        let raw = r#"{"tool": "youtube_search", "query": "cooking"}"#;
        let call = parse_tool_call(raw).unwrap();
        assert!(matches!(
            call,
            ToolCall::YoutubeSearch {
                kind: SearchKind::Search,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let raw = "Sure! Here's my decision:\n{\"tool\": \"chat_response\", \"message\": \"hi\"}\nDone.";
        let call = parse_tool_call(raw).unwrap();
        assert_eq!(
            call,
            ToolCall::ChatResponse {
                message: "hi".to_string()
            }
        );
    }

    #[test]
    fn test_parse_generate_script_with_defaults() {
        let raw = r#"{"tool": "generate_script", "inputText": "a transcript"}"#;
        let call = parse_tool_call(raw).unwrap();
        let ToolCall::GenerateScript {
            input_text,
            niche,
            tone,
            duration,
        } = call
        else {
            panic!("wrong variant");
        };
        assert_eq!(input_text, "a transcript");
        assert_eq!(niche, "general");
        assert_eq!(tone, Tone::Casual);
        assert_eq!(duration, 60);
    }

    #[test]
    fn test_parse_create_video_idea() {
        let raw = r#"{"tool": "create_video_idea", "topic": "tokyo", "context": "trip", "userIntent": "travel content"}"#;
        let call = parse_tool_call(raw).unwrap();
        assert_eq!(call.name(), "create_video_idea");
    }

    #[test]
    fn test_parse_rejects_unknown_tool() {
        assert!(parse_tool_call(r#"{"tool": "launch_rockets"}"#).is_none());
    }

    #[test]
    fn test_parse_rejects_no_json() {
        assert!(parse_tool_call("I would search YouTube for that.").is_none());
        assert!(parse_tool_call("").is_none());
    }

    #[test]
    fn test_extract_json_outermost() {
        let raw = "prefix {\"a\": {\"b\": 1}} suffix";
        assert_eq!(extract_json(raw), Some("{\"a\": {\"b\": 1}}"));
    }
}
