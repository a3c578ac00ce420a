//! Conversation transcript storage.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::ToolCall;

/// Role of a transcript message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// User message.
    User,
    /// Assistant response.
    Assistant,
    /// Tool progress or status message.
    Tool,
}

impl AgentRole {
    fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message in the agent conversation.
///
/// Tool messages carry the [`ToolCall`] that produced them; assistant
/// messages may carry a structured `tool_result` payload alongside the
/// formatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Message identifier, `{role}_{millis}`.
    pub id: String,
    /// Author role.
    pub role: AgentRole,
    /// Rendered message text (markdown for assistant messages).
    pub content: String,
    /// Tool call attached to this message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    /// Structured tool output attached to this message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<serde_json::Value>,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
}

impl AgentMessage {
    /// Create a message with the given role and content.
    #[must_use]
    pub fn new(role: AgentRole, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("{}_{}", role.as_str(), now.timestamp_millis()),
            role,
            content: content.into(),
            tool_call: None,
            tool_result: None,
            timestamp: now,
        }
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(AgentRole::User, content)
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(AgentRole::Assistant, content)
    }

    /// Create a tool status message.
    #[must_use]
    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(AgentRole::Tool, content)
    }

    /// Attach the tool call that produced this message.
    #[must_use]
    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_call = Some(call);
        self
    }

    /// Attach a structured tool result payload.
    #[must_use]
    pub fn with_tool_result(mut self, result: serde_json::Value) -> Self {
        self.tool_result = Some(result);
        self
    }
}

/// Process-wide conversation transcript.
///
/// Clones share the same underlying message list.
#[derive(Debug, Clone)]
pub struct Transcript {
    inner: Arc<TranscriptInner>,
}

#[derive(Debug)]
struct TranscriptInner {
    messages: RwLock<Vec<AgentMessage>>,
    created_at: DateTime<Utc>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// Create an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TranscriptInner {
                messages: RwLock::new(Vec::new()),
                created_at: Utc::now(),
            }),
        }
    }

    /// Append a message.
    pub fn push(&self, message: AgentMessage) {
        let mut guard = self.inner.messages.write().unwrap();
        guard.push(message);
    }

    /// Append several messages in order.
    pub fn extend(&self, messages: impl IntoIterator<Item = AgentMessage>) {
        let mut guard = self.inner.messages.write().unwrap();
        guard.extend(messages);
    }

    /// Get a copy of all messages.
    #[must_use]
    pub fn messages(&self) -> Vec<AgentMessage> {
        self.inner.messages.read().unwrap().clone()
    }

    /// Get a copy of the last `n` messages.
    #[must_use]
    pub fn tail(&self, n: usize) -> Vec<AgentMessage> {
        let guard = self.inner.messages.read().unwrap();
        let skip = guard.len().saturating_sub(n);
        guard[skip..].to_vec()
    }

    /// Number of messages in the transcript.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.messages.read().unwrap().len()
    }

    /// Whether the transcript is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all messages.
    pub fn clear(&self) {
        let mut guard = self.inner.messages.write().unwrap();
        guard.clear();
    }

    /// When this transcript was created (process start, in practice).
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_lifecycle() {
        let transcript = Transcript::new();

        assert!(transcript.is_empty());

        transcript.push(AgentMessage::user("Hello"));
        assert_eq!(transcript.len(), 1);

        transcript.push(AgentMessage::assistant("Hi there!"));
        assert_eq!(transcript.len(), 2);

        let messages = transcript.messages();
        assert_eq!(messages[0].role, AgentRole::User);
        assert_eq!(messages[1].role, AgentRole::Assistant);
    }

    #[test]
    fn test_clones_share_state() {
        let transcript = Transcript::new();
        let view = transcript.clone();

        transcript.push(AgentMessage::user("one"));
        assert_eq!(view.len(), 1);

        view.clear();
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_tail() {
        let transcript = Transcript::new();
        for i in 0..5 {
            transcript.push(AgentMessage::user(format!("msg {i}")));
        }

        let tail = transcript.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].content, "msg 3");
        assert_eq!(tail[1].content, "msg 4");

        // Asking for more than exists returns everything
        assert_eq!(transcript.tail(50).len(), 5);
    }

    #[test]
    fn test_message_id_shape() {
        let msg = AgentMessage::tool("working...");
        assert!(msg.id.starts_with("tool_"));
        assert_eq!(msg.role, AgentRole::Tool);
        assert!(msg.tool_call.is_none());
        assert!(msg.tool_result.is_none());
    }
}
