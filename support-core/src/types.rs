//! Core types: message roles and content blocks, the per-agent transcript, and the TurnHook trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One block of message content. Tool results travel back to the model as user messages, so a
/// user message whose first block is a [`ContentBlock::ToolResult`] is not a genuine user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        tool_use_id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
}

/// A single message in an agent transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
    /// First text block as the user typed it, set once a hook has rewritten that block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typed_text: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: Vec<ContentBlock>) -> Self {
        Self {
            role,
            content,
            typed_text: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentBlock::Text { text: text.into() }])
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentBlock::Text { text: text.into() }])
    }

    /// Text of the first block, when that block is text.
    pub fn first_text(&self) -> Option<&str> {
        match self.content.first() {
            Some(ContentBlock::Text { text }) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Text before any hook rewrite; the first text block when it was never rewritten.
    pub fn typed_text(&self) -> Option<&str> {
        self.typed_text.as_deref().or_else(|| self.first_text())
    }

    fn first_text_mut(&mut self) -> Option<&mut String> {
        match self.content.first_mut() {
            Some(ContentBlock::Text { text }) => Some(text),
            _ => None,
        }
    }

    /// True when the first block echoes a tool result back to the model.
    pub fn is_tool_result(&self) -> bool {
        matches!(self.content.first(), Some(ContentBlock::ToolResult { .. }))
    }

    /// A user message that a person actually typed (not a tool-result echo).
    pub fn is_genuine_user(&self) -> bool {
        self.role == Role::User && !self.is_tool_result()
    }
}

/// Ordered messages of one agent conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Drops every message after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }

    /// Drops the oldest exchanges until at most `max_messages` remain. Cuts only in front of a
    /// genuine user message, so tool traffic stays with the request that caused it; when even the
    /// newest exchange does not fit, everything goes. Returns the number of messages dropped.
    pub fn trim_to_window(&mut self, max_messages: usize) -> usize {
        let len = self.messages.len();
        if len <= max_messages {
            return 0;
        }
        let start = self
            .messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_genuine_user())
            .map(|(i, _)| i)
            .find(|i| len - i <= max_messages)
            .unwrap_or(len);
        self.messages.drain(..start);
        start
    }

    /// Text of the last message when it is a genuine user message with a text first block.
    pub fn pending_user_query(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.is_genuine_user())
            .and_then(Message::first_text)
    }

    /// [`Self::pending_user_query`] as typed, ignoring rewrites by earlier hooks.
    pub fn pending_typed_query(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.is_genuine_user())
            .and_then(Message::typed_text)
    }

    /// Replaces the pending user text with `rewrite(text)`, keeping the typed text on the message.
    /// Returns false when there is no pending user text.
    pub fn rewrite_pending_user_query(&mut self, rewrite: impl FnOnce(&str) -> String) -> bool {
        let Some(message) = self.messages.last_mut().filter(|m| m.is_genuine_user()) else {
            return false;
        };
        let Some(text) = message.first_text_mut() else {
            return false;
        };
        let rewritten = rewrite(text.as_str());
        let typed = std::mem::replace(text, rewritten);
        message.typed_text.get_or_insert(typed);
        true
    }

    /// `(user_text, assistant_text)` of the turn that just finished. The user side is the text as
    /// typed, without context a hook injected.
    ///
    /// Requires the last message to be an assistant message with text; walks backward past tool
    /// traffic to the nearest genuine user message. `None` when either side is missing.
    pub fn last_exchange(&self) -> Option<(&str, &str)> {
        if self.messages.len() < 2 {
            return None;
        }
        let last = self.messages.last()?;
        if last.role != Role::Assistant {
            return None;
        }
        let response = last.first_text()?;
        let query = self
            .messages
            .iter()
            .rev()
            .skip(1)
            .find(|m| m.is_genuine_user())
            .and_then(Message::typed_text)?;
        Some((query, response))
    }
}

/// Turn-scoped hook around an agent invocation.
///
/// `on_turn_start` runs after the user message is appended and before the model is called; it may
/// rewrite the transcript. `on_turn_end` runs after the final assistant message is appended.
#[async_trait]
pub trait TurnHook: Send + Sync {
    async fn on_turn_start(&self, _transcript: &mut Transcript) -> crate::error::Result<()> {
        Ok(())
    }

    async fn on_turn_end(&self, _transcript: &Transcript) -> crate::error::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_result(id: &str, content: &str) -> Message {
        Message::new(
            Role::User,
            vec![ContentBlock::ToolResult {
                tool_use_id: id.to_string(),
                content: content.to_string(),
            }],
        )
    }

    #[test]
    fn test_pending_user_query_skips_tool_results() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("where is my order"));
        assert_eq!(transcript.pending_user_query(), Some("where is my order"));

        transcript.push(tool_result("t1", "shipped"));
        assert_eq!(transcript.pending_user_query(), None);
    }

    #[test]
    fn test_last_exchange_walks_past_tool_traffic() {
        let transcript = Transcript::from_messages(vec![
            Message::user("is the laptop in stock"),
            Message::new(
                Role::Assistant,
                vec![ContentBlock::ToolUse {
                    tool_use_id: "t1".to_string(),
                    name: "get_product_info".to_string(),
                    input: serde_json::json!({"product_type": "laptops"}),
                }],
            ),
            tool_result("t1", "Laptops: 1-year warranty"),
            Message::assistant("Yes, with a one year warranty."),
        ]);

        assert_eq!(
            transcript.last_exchange(),
            Some(("is the laptop in stock", "Yes, with a one year warranty."))
        );
    }

    #[test]
    fn test_last_exchange_requires_trailing_assistant() {
        let transcript = Transcript::from_messages(vec![
            Message::assistant("hello"),
            Message::user("hi"),
        ]);
        assert_eq!(transcript.last_exchange(), None);

        let single = Transcript::from_messages(vec![Message::assistant("hello")]);
        assert_eq!(single.last_exchange(), None);
    }

    /// **Test: A rewritten query is sent as rewritten but reported as typed.**
    ///
    /// **Setup:** Pending user message "battery drains".
    /// **Action:** Two rewrites (as two hooks would), then an assistant reply.
    /// **Expected:** Current text carries both prefixes; typed query and exchange keep "battery drains".
    #[test]
    fn test_rewrite_keeps_typed_text() {
        let mut transcript = Transcript::from_messages(vec![Message::user("battery drains")]);

        assert!(transcript.rewrite_pending_user_query(|t| format!("A\n\n{}", t)));
        assert!(transcript.rewrite_pending_user_query(|t| format!("B\n\n{}", t)));

        assert_eq!(transcript.pending_user_query(), Some("B\n\nA\n\nbattery drains"));
        assert_eq!(transcript.pending_typed_query(), Some("battery drains"));

        transcript.push(Message::assistant("Lower the brightness."));
        assert_eq!(
            transcript.last_exchange(),
            Some(("battery drains", "Lower the brightness."))
        );
        assert!(!transcript.rewrite_pending_user_query(|t| t.to_string()));
    }

    /// **Test: Trimming drops whole exchanges from the front.**
    ///
    /// **Setup:** Exchange 1 with tool traffic (4 messages), exchanges 2 and 3 (2 each).
    /// **Action:** Trim to windows of 5, 8 and 1.
    /// **Expected:** 5 keeps exchanges 2-3; 8 is a no-op; 1 empties the transcript.
    #[test]
    fn test_trim_to_window_keeps_exchanges_whole() {
        let build = || {
            Transcript::from_messages(vec![
                Message::user("q1"),
                Message::new(
                    Role::Assistant,
                    vec![ContentBlock::ToolUse {
                        tool_use_id: "t1".to_string(),
                        name: "get_product_info".to_string(),
                        input: serde_json::json!({}),
                    }],
                ),
                tool_result("t1", "result"),
                Message::assistant("a1"),
                Message::user("q2"),
                Message::assistant("a2"),
                Message::user("q3"),
                Message::assistant("a3"),
            ])
        };

        let mut transcript = build();
        assert_eq!(transcript.trim_to_window(5), 4);
        assert_eq!(transcript.messages()[0], Message::user("q2"));
        assert_eq!(transcript.len(), 4);

        let mut untouched = build();
        assert_eq!(untouched.trim_to_window(8), 0);
        assert_eq!(untouched.len(), 8);

        let mut tiny = build();
        assert_eq!(tiny.trim_to_window(1), 8);
        assert!(tiny.is_empty());
    }
}
