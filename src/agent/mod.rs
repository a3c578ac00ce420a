//! The agent orchestrator core.
//!
//! Per user message the agent decides between two paths:
//!
//! 1. **Single tool**: ask the LLM to emit a JSON tool call
//!    (search / transcribe / generate / chat), parse it leniently, and
//!    execute that one tool.
//! 2. **Video-idea pipeline**: when the intent classifier fires, run the
//!    fixed sequence search → transcribe top results → generate three
//!    script variants → format one combined response.
//!
//! Every produced message is appended to the process-wide transcript and,
//! optionally, forwarded over an event channel for SSE delivery.

mod intent;
mod orchestrator;
mod tools;

pub use intent::is_video_idea_request;
pub use orchestrator::{Agent, TopicData};
pub use tools::{FALLBACK_HELP, SearchKind, ToolCall, parse_tool_call};
