//! Agent orchestration.
//!
//! `Agent::process_message` is the single entry point: it appends the user
//! message to the transcript, classifies the request, and either executes
//! one LLM-selected tool or runs the fixed video-idea pipeline. Failures
//! degrade into apologetic assistant messages; the transcript always ends
//! in a usable response.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::{AppConfig, YoutubeConfig};
use crate::events::AgentEvent;
use crate::llm::{CompletionRequest, LlmDriver};
use crate::scripts::{ScriptGenerator, ScriptRequest, Tone, VideoScript};
use crate::session::{AgentMessage, Transcript};
use crate::transcribe::Transcriber;
use crate::trends::{TrendingVideo, TrendsClient};

use super::intent::is_video_idea_request;
use super::tools::{FALLBACK_HELP, SearchKind, ToolCall, parse_tool_call};

/// Channel over which produced messages are forwarded for SSE delivery.
pub type EventSink = mpsc::UnboundedSender<AgentEvent>;

/// Topic, context, and intent extracted from a video-idea request.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicData {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub intent: String,
}

/// Everything the video-idea pipeline produces for one request.
struct VideoIdeaResult {
    summary: String,
    scripts: Vec<VideoScript>,
    source_videos: Vec<TrendingVideo>,
    suggestions: Vec<String>,
}

/// One planned script variant for the pipeline.
struct ScriptPlan {
    variant: &'static str,
    template: String,
    hook: String,
}

fn script_plans(topic: &str) -> [ScriptPlan; 3] {
    [
        ScriptPlan {
            variant: "Quick Tips",
            template: format!("Create a viral \"5 things\" style script about {topic}"),
            hook: format!("Only have 1 day in {topic}? Here's how to do it all."),
        },
        ScriptPlan {
            variant: "AI Experiment",
            template: format!("Create an \"I let AI plan my...\" style script for {topic}"),
            hook: format!("Can AI plan the perfect {topic} experience?"),
        },
        ScriptPlan {
            variant: "Hidden Gems",
            template: format!("Create a \"locals only\" secrets script about {topic}"),
            hook: format!("Hidden gems only locals know about {topic}"),
        },
    ]
}

/// The agent orchestrator.
///
/// Holds the LLM driver and the service handles it dispatches to, plus the
/// process-wide transcript it appends to.
#[derive(Clone)]
pub struct Agent {
    llm: Arc<dyn LlmDriver>,
    trends: Arc<TrendsClient>,
    transcriber: Arc<Transcriber>,
    scripts: Arc<ScriptGenerator>,
    transcript: Transcript,
    youtube: YoutubeConfig,
    transcribe_top_n: usize,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("youtube", &self.youtube)
            .field("transcribe_top_n", &self.transcribe_top_n)
            .finish()
    }
}

impl Agent {
    /// Create an agent wired to the given services and transcript.
    #[must_use]
    pub fn new(
        llm: Arc<dyn LlmDriver>,
        trends: Arc<TrendsClient>,
        transcriber: Arc<Transcriber>,
        scripts: Arc<ScriptGenerator>,
        transcript: Transcript,
        config: &AppConfig,
    ) -> Self {
        Self {
            llm,
            trends,
            transcriber,
            scripts,
            transcript,
            youtube: config.youtube.clone(),
            transcribe_top_n: config.pipeline.transcribe_top_n,
        }
    }

    /// Process a user message and return the produced messages.
    pub async fn process_message(&self, user_message: &str) -> Vec<AgentMessage> {
        self.process_message_with_events(user_message, None).await
    }

    /// Process a user message, forwarding each produced message over `sink`.
    pub async fn process_message_with_events(
        &self,
        user_message: &str,
        sink: Option<&EventSink>,
    ) -> Vec<AgentMessage> {
        self.transcript.push(AgentMessage::user(user_message));

        if is_video_idea_request(user_message) {
            info!(name: "agent.pipeline.selected", "Video-idea request detected");
            let topic = self.extract_topic(user_message).await;
            return self.run_video_idea(topic, sink).await;
        }

        let call = self.decide_tool(user_message).await;
        info!(name: "agent.tool.selected", tool = call.name(), "Tool selected");

        match call {
            ToolCall::CreateVideoIdea {
                topic,
                context,
                user_intent,
            } => {
                self.run_video_idea(
                    TopicData {
                        topic,
                        context,
                        intent: user_intent,
                    },
                    sink,
                )
                .await
            }
            other => self.execute_tool(other, sink).await,
        }
    }

    /// Append a message to the transcript, forward it, and collect it.
    fn emit(&self, out: &mut Vec<AgentMessage>, sink: Option<&EventSink>, message: AgentMessage) {
        self.transcript.push(message.clone());
        if let Some(tx) = sink {
            let _ = tx.send(AgentEvent::Message {
                message: message.clone(),
            });
        }
        out.push(message);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tool selection
    // ─────────────────────────────────────────────────────────────────────

    /// Ask the LLM to pick one tool for the message.
    ///
    /// Any failure (transport, parse, schema) degrades to a canned
    /// `chat_response`.
    async fn decide_tool(&self, user_message: &str) -> ToolCall {
        let prompt = format!(
            "{}\n\nUser: {user_message}\nAssistant:",
            tool_selection_prompt(user_message)
        );

        let raw = match self
            .llm
            .complete(CompletionRequest::deterministic(prompt))
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Tool decision call failed, using chat fallback");
                return ToolCall::ChatResponse {
                    message: FALLBACK_HELP.to_string(),
                };
            }
        };

        parse_tool_call(&raw).unwrap_or_else(|| {
            warn!("No valid tool call in model output, using chat fallback");
            ToolCall::ChatResponse {
                message: FALLBACK_HELP.to_string(),
            }
        })
    }

    /// Extract topic/context/intent for the pipeline, with a deterministic
    /// keyword fallback when the LLM is unavailable or off-script.
    async fn extract_topic(&self, user_message: &str) -> TopicData {
        let prompt = topic_extraction_prompt(user_message);

        match self
            .llm
            .complete(CompletionRequest::deterministic(prompt))
            .await
        {
            Ok(raw) => {
                if let Some(json) = super::tools::extract_json(&raw)
                    && let Ok(topic) = serde_json::from_str::<TopicData>(json)
                    && !topic.topic.is_empty()
                {
                    return topic;
                }
                warn!("Topic extraction produced no usable JSON, using keyword fallback");
            }
            Err(e) => {
                warn!(error = %e, "Topic extraction call failed, using keyword fallback");
            }
        }

        fallback_topic(user_message)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Video-idea pipeline
    // ─────────────────────────────────────────────────────────────────────

    /// The fixed pipeline: search → transcribe → generate → format.
    async fn run_video_idea(
        &self,
        topic: TopicData,
        sink: Option<&EventSink>,
    ) -> Vec<AgentMessage> {
        let mut responses = Vec::new();

        let thinking = AgentMessage::tool(format!(
            "🧠 Analyzing your request: \"{}\"...",
            topic.topic
        ))
        .with_tool_call(ToolCall::CreateVideoIdea {
            topic: topic.topic.clone(),
            context: topic.context.clone(),
            user_intent: topic.intent.clone(),
        });
        self.emit(&mut responses, sink, thinking);

        let videos = match self.trends.search(&topic.topic).await {
            Ok(videos) => videos,
            Err(e) => {
                error!(error = %e, topic = %topic.topic, "Video-idea pipeline failed at search");
                let apology = AgentMessage::assistant(format!(
                    "Sorry, I encountered an error while creating your video ideas: {e}. \
                     Let me try a simpler approach - what specific type of content are you \
                     looking to create?"
                ));
                self.emit(&mut responses, sink, apology);
                return responses;
            }
        };

        self.emit(
            &mut responses,
            sink,
            AgentMessage::tool(format!(
                "🔍 Found {} trending videos about \"{}\"...",
                videos.len(),
                topic.topic
            )),
        );
        self.emit(
            &mut responses,
            sink,
            AgentMessage::tool("📝 Analyzing video content and extracting viral patterns..."),
        );

        let top: Vec<TrendingVideo> = videos.into_iter().take(self.transcribe_top_n).collect();
        let transcripts = self.transcribe_all(&top).await;

        self.emit(
            &mut responses,
            sink,
            AgentMessage::tool(format!(
                "🎬 Creating personalized scripts for your {} content...",
                topic.topic
            )),
        );

        let ideas = self.generate_video_ideas(&topic, &transcripts).await;
        let content = format_video_idea_response(&ideas);

        let final_msg = AgentMessage::assistant(content).with_tool_result(json!({
            "videos": ideas.source_videos,
            "scripts": ideas.scripts,
            "topic": topic.topic,
        }));
        self.emit(&mut responses, sink, final_msg);

        responses
    }

    /// Transcribe videos concurrently; a failed transcription degrades to a
    /// caption placeholder.
    async fn transcribe_all(&self, videos: &[TrendingVideo]) -> Vec<(TrendingVideo, String)> {
        let tasks = videos.iter().map(|video| async move {
            let transcript = match self.transcriber.transcribe_url(&video.url).await {
                Ok(t) => t.transcript,
                Err(e) => {
                    warn!(video_id = %video.id, error = %e, "Transcription degraded to caption");
                    format!("Video about {}", video.caption)
                }
            };
            (video.clone(), transcript)
        });

        futures::future::join_all(tasks).await
    }

    /// Generate the three script variants for a topic.
    async fn generate_video_ideas(
        &self,
        topic: &TopicData,
        transcripts: &[(TrendingVideo, String)],
    ) -> VideoIdeaResult {
        let niche = if topic.context.is_empty() {
            "lifestyle".to_string()
        } else {
            topic.context.clone()
        };

        let mut scripts = Vec::new();

        for plan in script_plans(&topic.topic) {
            let req = ScriptRequest {
                input_text: format!(
                    "Topic: {}. Context: {}. Style: {}",
                    topic.topic, topic.context, plan.variant
                ),
                niche: niche.clone(),
                tone: Tone::Casual,
                duration: 30,
            };

            let (script, reasoning) = match self.scripts.try_generate(&req).await {
                Ok(script) => (
                    script,
                    format!(
                        "This {} format works because it's highly shareable and creates FOMO",
                        plan.variant.to_lowercase()
                    ),
                ),
                Err(e) => {
                    warn!(variant = plan.variant, error = %e, "Script variant degraded to template");
                    (
                        plan.template.clone(),
                        "This format is proven to drive engagement".to_string(),
                    )
                }
            };

            scripts.push(VideoScript {
                title: format!("{}: {}", plan.variant, topic.topic),
                hook: plan.hook,
                script,
                cta: cta_for(plan.variant),
                reasoning,
                hashtags: hashtags_for(&topic.topic, plan.variant),
            });
        }

        VideoIdeaResult {
            summary: format!(
                "Here are 3 video ideas based on current trends about {}:",
                topic.topic
            ),
            scripts,
            source_videos: transcripts.iter().map(|(v, _)| v.clone()).collect(),
            suggestions: vec![
                "Make this into a carousel post".to_string(),
                "Give me captions and hashtags".to_string(),
                "Create a longer version".to_string(),
                "Try this for a different location".to_string(),
            ],
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Single-tool execution
    // ─────────────────────────────────────────────────────────────────────

    /// Execute one tool call: a status message, the tool, a formatted reply.
    async fn execute_tool(&self, call: ToolCall, sink: Option<&EventSink>) -> Vec<AgentMessage> {
        let mut responses = Vec::new();

        let status =
            AgentMessage::tool(format!("Using {}...", call.name())).with_tool_call(call.clone());
        self.emit(&mut responses, sink, status);

        let message = match call {
            ToolCall::YoutubeSearch { query, kind } => {
                let result = match kind {
                    SearchKind::Search => self.trends.search(&query).await,
                    SearchKind::Popular => {
                        self.trends
                            .popular(
                                &self.youtube.category_id,
                                &self.youtube.region_code,
                                self.youtube.max_results,
                            )
                            .await
                    }
                };

                match result {
                    Ok(videos) => AgentMessage::assistant(format_youtube_results(&videos, &query))
                        .with_tool_result(json!({ "videos": videos })),
                    Err(e) => AgentMessage::assistant(tool_error_reply(&e.to_string())),
                }
            }

            ToolCall::TranscribeVideo {
                video_url,
                video_title,
            } => match self.transcriber.transcribe_url(&video_url).await {
                Ok(t) => AgentMessage::assistant(format_transcription_result(
                    &t.transcript,
                    video_title.as_deref(),
                ))
                .with_tool_result(json!({ "transcript": t.transcript, "videoId": t.video_id })),
                Err(e) => AgentMessage::assistant(tool_error_reply(&e.to_string())),
            },

            ToolCall::GenerateScript {
                input_text,
                niche,
                tone,
                duration,
            } => {
                let script = self
                    .scripts
                    .generate(&ScriptRequest {
                        input_text,
                        niche,
                        tone,
                        duration,
                    })
                    .await;
                AgentMessage::assistant(format_script_result(&script))
                    .with_tool_result(json!({ "script": script }))
            }

            ToolCall::ChatResponse { message } => AgentMessage::assistant(message),

            ToolCall::CreateVideoIdea { .. } => AgentMessage::assistant(
                "I'm not sure how to help with that. Try asking me to find videos, \
                 transcribe content, or generate scripts!",
            ),
        };

        self.emit(&mut responses, sink, message);
        responses
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Prompts and fallbacks
// ─────────────────────────────────────────────────────────────────────────────

fn tool_selection_prompt(user_message: &str) -> String {
    format!(
        "You are OpenScript AI, an intelligent agent that helps users create viral video content.\n\
         \n\
         Available tools:\n\
         1. youtube_search - Search for trending YouTube videos by keyword or get popular videos\n\
         2. transcribe_video - Transcribe audio from a YouTube video URL\n\
         3. generate_script - Generate viral scripts from transcripts or ideas\n\
         4. chat_response - Provide direct conversational responses\n\
         5. create_video_idea - Full workflow for high-level video content requests\n\
         \n\
         Analyze the user's message and decide which tool to use. Consider:\n\
         - If they want to find/search videos -> youtube_search\n\
         - If they have a video URL to transcribe -> transcribe_video\n\
         - If they want to create a script from content -> generate_script\n\
         - If they're asking for video ideas or mentioning travel/events -> create_video_idea\n\
         - If they're asking questions or chatting -> chat_response\n\
         \n\
         User message: \"{user_message}\"\n\
         \n\
         Respond ONLY with a JSON object matching one of these schemas:\n\
         - {{\"tool\": \"youtube_search\", \"query\": \"search term\", \"type\": \"search\" or \"popular\"}}\n\
         - {{\"tool\": \"transcribe_video\", \"videoUrl\": \"youtube url\", \"videoTitle\": \"optional title\"}}\n\
         - {{\"tool\": \"generate_script\", \"inputText\": \"content\", \"niche\": \"category\", \"tone\": \"casual/professional/energetic/educational\", \"duration\": 60}}\n\
         - {{\"tool\": \"create_video_idea\", \"topic\": \"main topic\", \"context\": \"additional context\", \"userIntent\": \"what they want\"}}\n\
         - {{\"tool\": \"chat_response\", \"message\": \"your response\"}}\n\
         \n\
         JSON:"
    )
}

fn topic_extraction_prompt(user_message: &str) -> String {
    format!(
        "Extract the main topic, context, and intent from this user message for video content creation.\n\
         \n\
         User message: \"{user_message}\"\n\
         \n\
         Respond with a JSON object with these fields:\n\
         - topic: Main subject (e.g., \"San Francisco\", \"productivity tips\", \"cooking\")\n\
         - context: Additional context (e.g., \"upcoming trip\", \"work from home\", \"beginner level\")\n\
         - intent: What they want to achieve (e.g., \"travel content\", \"educational video\", \"entertainment\")\n\
         \n\
         JSON:"
    )
}

const TRAVEL_WORDS: [&str; 3] = ["going", "trip", "visit"];

const KNOWN_LOCATIONS: [&str; 7] = [
    "san francisco",
    "sf",
    "new york",
    "la",
    "los angeles",
    "miami",
    "chicago",
];

/// Keyword-based topic extraction used when the LLM is unavailable.
fn fallback_topic(user_message: &str) -> TopicData {
    let lower = user_message.to_lowercase();

    let mut topic = "content creation".to_string();
    let mut context = "general".to_string();

    if lower
        .split_whitespace()
        .any(|word| TRAVEL_WORDS.contains(&word))
    {
        context = "travel".to_string();
        if let Some(location) = KNOWN_LOCATIONS.iter().find(|loc| lower.contains(*loc)) {
            topic = (*location).to_string();
        }
    }

    TopicData {
        topic,
        context,
        intent: "video ideas".to_string(),
    }
}

fn tool_error_reply(detail: &str) -> String {
    format!("Sorry, I encountered an error: {detail}. Please try again or ask me something else!")
}

fn cta_for(variant: &str) -> String {
    match variant {
        "Quick Tips" => "Save this for your next trip!",
        "AI Experiment" => "Would you trust AI with your plans?",
        "Hidden Gems" => "Follow for more local secrets!",
        _ => "Double tap if this helped!",
    }
    .to_string()
}

fn hashtags_for(topic: &str, variant: &str) -> Vec<String> {
    let mut tags = vec![
        "#viral".to_string(),
        "#fyp".to_string(),
        "#trending".to_string(),
    ];

    let topic_tag: String = topic.split_whitespace().collect();
    tags.push(format!("#{}", topic_tag.to_lowercase()));

    let variant_tags: &[&str] = match variant {
        "Quick Tips" => &["#tips", "#guide"],
        "AI Experiment" => &["#ai", "#experiment"],
        _ => &["#hidden", "#local", "#secret"],
    };
    tags.extend(variant_tags.iter().map(ToString::to_string));

    tags.truncate(8);
    tags
}

// ─────────────────────────────────────────────────────────────────────────────
// Markdown formatting
// ─────────────────────────────────────────────────────────────────────────────

fn format_youtube_results(videos: &[TrendingVideo], query: &str) -> String {
    if videos.is_empty() {
        return format!("I couldn't find any videos for \"{query}\". Try a different search term!");
    }

    let shown = &videos[..videos.len().min(5)];
    let mut out = format!(
        "🎥 **Found {} trending videos for \"{query}\":**\n\n",
        shown.len()
    );

    for (index, video) in shown.iter().enumerate() {
        out.push_str(&format!("**{}. {}**\n", index + 1, video.caption));
        out.push_str(&format!(
            "👤 {} • 👁️ {} views • ⏱️ {}\n",
            video.author,
            format_count(video.views),
            format_clock(video.duration)
        ));
        out.push_str(&format!("🔗 {}\n\n", video.url));
    }

    out.push_str(
        "💡 **What would you like to do next?**\n\
         • Ask me to transcribe any of these videos\n\
         • Generate a script based on a video\n\
         • Search for different content",
    );

    out
}

fn format_transcription_result(transcript: &str, video_title: Option<&str>) -> String {
    if transcript.is_empty() {
        return "I couldn't transcribe that video. It might be private or unavailable.".to_string();
    }

    let title = video_title
        .map(|t| format!(" for \"{t}\""))
        .unwrap_or_default();

    format!(
        "📝 **Transcription complete{title}!**\n\n\
         **Transcript:**\n{transcript}\n\n\
         💡 **Next steps:**\n\
         • Ask me to generate a viral script from this transcript\n\
         • Search for more videos to analyze\n\
         • Get content optimization tips"
    )
}

fn format_script_result(script: &str) -> String {
    if script.is_empty() {
        return "I couldn't generate a script. Please try again with different parameters."
            .to_string();
    }

    format!(
        "🎬 **Your viral script is ready!**\n\n\
         {script}\n\n\
         💡 **Want to improve this script?**\n\
         • Ask me to adjust the tone or style\n\
         • Generate variations for different platforms\n\
         • Get tips for better engagement"
    )
}

fn format_video_idea_response(ideas: &VideoIdeaResult) -> String {
    let mut out = format!("🧠 {}\n\n", ideas.summary);

    for script in &ideas.scripts {
        out.push_str(&format!("## 🎥 **{}**\n\n", script.title));
        out.push_str(&format!("**Hook:** \"{}\"\n\n", script.hook));
        out.push_str(&format!("**Script:**\n{}\n\n", script.script));
        out.push_str(&format!("**CTA:** {}\n\n", script.cta));
        out.push_str(&format!("**Why this works:** {}\n\n", script.reasoning));
        out.push_str(&format!("**Hashtags:** {}\n\n", script.hashtags.join(" ")));
        out.push_str("---\n\n");
    }

    out.push_str("✨ **Want to explore more?**\n");
    for suggestion in &ideas.suggestions {
        out.push_str(&format!("• {suggestion}\n"));
    }

    out
}

/// Human-readable view counts: `1.2M`, `3.4K`, `999`.
fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// `m:ss` for durations with minutes, `{s}s` below a minute.
fn format_clock(seconds: u64) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    if mins > 0 {
        format!("{mins}:{secs:02}")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::session::AgentRole;

    /// LLM stub with a fixed reply (or a fixed failure).
    struct StubLlm {
        reply: Option<String>,
    }

    #[async_trait::async_trait]
    impl LlmDriver for StubLlm {
        async fn complete(&self, _req: CompletionRequest) -> anyhow::Result<String> {
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => anyhow::bail!("stub: LLM unavailable"),
            }
        }
    }

    fn test_agent(reply: Option<&str>) -> (Agent, Transcript) {
        let llm: Arc<dyn LlmDriver> = Arc::new(StubLlm {
            reply: reply.map(ToString::to_string),
        });
        let transcript = Transcript::new();
        let config = AppConfig::load_from_args(["openscript"]).expect("default config");

        let agent = Agent::new(
            Arc::clone(&llm),
            Arc::new(TrendsClient::new(None)),
            Arc::new(Transcriber::new(None)),
            Arc::new(ScriptGenerator::new(llm)),
            transcript.clone(),
            &config,
        );
        (agent, transcript)
    }

    #[tokio::test]
    async fn test_chat_fallback_when_llm_unavailable() {
        let (agent, transcript) = test_agent(None);

        let responses = agent.process_message("hello").await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].role, AgentRole::Tool);
        assert_eq!(responses[0].content, "Using chat_response...");
        assert_eq!(responses[1].role, AgentRole::Assistant);
        assert_eq!(responses[1].content, FALLBACK_HELP);

        // user + tool + assistant
        assert_eq!(transcript.len(), 3);
    }

    #[tokio::test]
    async fn test_chat_response_tool_executes() {
        let (agent, _) =
            test_agent(Some(r#"{"tool": "chat_response", "message": "Hey, creator!"}"#));

        let responses = agent.process_message("hello").await;

        assert_eq!(responses[1].content, "Hey, creator!");
        assert!(responses[1].tool_result.is_none());
    }

    #[tokio::test]
    async fn test_search_tool_degrades_without_api_key() {
        let (agent, _) =
            test_agent(Some(r#"{"tool": "youtube_search", "query": "cats", "type": "search"}"#));

        let responses = agent.process_message("hello").await;

        assert!(responses[1].content.starts_with("Sorry, I encountered an error:"));
        assert!(responses[1].content.contains("YOUTUBE_API_KEY"));
    }

    #[tokio::test]
    async fn test_pipeline_apologizes_when_search_fails() {
        // Classifier fires on "I'm going to ..."; search has no API key.
        let (agent, transcript) = test_agent(None);

        let responses = agent.process_message("I'm going to San Francisco").await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].role, AgentRole::Tool);
        assert!(responses[0].content.contains("san francisco"));
        assert!(matches!(
            responses[0].tool_call,
            Some(ToolCall::CreateVideoIdea { .. })
        ));
        assert!(
            responses[1]
                .content
                .starts_with("Sorry, I encountered an error while creating your video ideas:")
        );
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn test_fallback_topic_travel() {
        let topic = fallback_topic("I'm going to San Francisco next month");
        assert_eq!(topic.topic, "san francisco");
        assert_eq!(topic.context, "travel");
        assert_eq!(topic.intent, "video ideas");
    }

    #[test]
    fn test_fallback_topic_general() {
        let topic = fallback_topic("make me famous");
        assert_eq!(topic.topic, "content creation");
        assert_eq!(topic.context, "general");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_500), "1.5K");
        assert_eq!(format_count(2_340_000), "2.3M");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(45), "45s");
        assert_eq!(format_clock(90), "1:30");
        assert_eq!(format_clock(605), "10:05");
    }

    #[test]
    fn test_hashtags_capped_and_shaped() {
        let tags = hashtags_for("San Francisco", "Quick Tips");
        assert!(tags.contains(&"#sanfrancisco".to_string()));
        assert!(tags.contains(&"#tips".to_string()));
        assert!(tags.len() <= 8);

        let gem_tags = hashtags_for("tokyo", "Hidden Gems");
        assert!(gem_tags.contains(&"#secret".to_string()));
    }

    #[test]
    fn test_cta_variants() {
        assert_eq!(cta_for("Quick Tips"), "Save this for your next trip!");
        assert_eq!(cta_for("anything else"), "Double tap if this helped!");
    }

    #[test]
    fn test_format_youtube_results_empty() {
        let out = format_youtube_results(&[], "cats");
        assert!(out.contains("couldn't find any videos"));
        assert!(out.contains("cats"));
    }

    #[test]
    fn test_format_transcription_with_title() {
        let out = format_transcription_result("words", Some("My Video"));
        assert!(out.contains("for \"My Video\""));
        assert!(out.contains("words"));

        let empty = format_transcription_result("", None);
        assert!(empty.contains("couldn't transcribe"));
    }

    #[test]
    fn test_format_video_idea_response_shape() {
        let ideas = VideoIdeaResult {
            summary: "Here are 3 video ideas based on current trends about tokyo:".to_string(),
            scripts: vec![VideoScript {
                title: "Quick Tips: tokyo".to_string(),
                hook: "hook".to_string(),
                script: "body".to_string(),
                cta: "cta".to_string(),
                reasoning: "works".to_string(),
                hashtags: vec!["#viral".to_string()],
            }],
            source_videos: vec![],
            suggestions: vec!["Create a longer version".to_string()],
        };

        let out = format_video_idea_response(&ideas);
        assert!(out.starts_with("🧠 Here are 3 video ideas"));
        assert!(out.contains("## 🎥 **Quick Tips: tokyo**"));
        assert!(out.contains("**Hashtags:** #viral"));
        assert!(out.contains("• Create a longer version"));
    }
}
