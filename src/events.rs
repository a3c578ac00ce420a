//! Streaming event model for the agent SSE endpoint.
//!
//! The agent produces whole messages rather than token deltas, so the event
//! vocabulary is small: stream lifecycle, appended messages, errors.
//!
//! # Example
//!
//! ```rust
//! use openscript::events::{AgentEvent, sse_event};
//!
//! let sse = sse_event(&AgentEvent::Done);
//! assert!(sse.contains("event: done"));
//! ```

use serde::{Deserialize, Serialize};

use crate::session::AgentMessage;

/// Events emitted over the agent's SSE stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum AgentEvent {
    /// Indicates the start of a new streaming response.
    #[serde(rename = "stream.start")]
    StreamStart {
        /// Unique identifier for this request/response pair.
        request_id: String,
    },

    /// A message was appended to the transcript.
    #[serde(rename = "message")]
    Message {
        /// The appended message.
        message: AgentMessage,
    },

    /// An error occurred during processing.
    #[serde(rename = "error")]
    Error {
        /// Error message.
        message: String,
        /// Optional error code for programmatic handling.
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },

    /// Stream has completed.
    #[serde(rename = "done")]
    Done,
}

/// Convert an [`AgentEvent`] to an SSE-formatted string.
///
/// The output follows the Server-Sent Events specification with both an
/// `event:` line (for `EventSource` listeners) and a `data:` line containing
/// the JSON payload.
pub fn sse_event(evt: &AgentEvent) -> String {
    let json = serde_json::to_string(evt).unwrap_or_else(|e| {
        serde_json::json!({ "type": "error", "data": { "message": e.to_string() } }).to_string()
    });

    format!("event: {}\ndata: {json}\n\n", event_name(evt))
}

/// Get the SSE event name for an [`AgentEvent`].
pub fn event_name(evt: &AgentEvent) -> &'static str {
    match evt {
        AgentEvent::StreamStart { .. } => "stream.start",
        AgentEvent::Message { .. } => "message",
        AgentEvent::Error { .. } => "error",
        AgentEvent::Done => "done",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_event_serialization() {
        let event = AgentEvent::Message {
            message: AgentMessage::assistant("Hello"),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"message\""));
        assert!(json.contains("Hello"));
    }

    #[test]
    fn test_sse_event_format() {
        let event = AgentEvent::Done;
        let sse = sse_event(&event);
        assert!(sse.starts_with("event: done\n"));
        assert!(sse.contains("data: "));
        assert!(sse.ends_with("\n\n"));
    }

    #[test]
    fn test_error_event_omits_missing_code() {
        let event = AgentEvent::Error {
            message: "boom".to_string(),
            code: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("code"));
    }
}
