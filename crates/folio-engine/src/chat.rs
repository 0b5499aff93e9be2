//! Message model for the portfolio chat.
//!
//! This module provides the transcript message type and the JSON request
//! body the remote chat endpoint expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (instructions to the model).
    System,
    /// User message.
    User,
    /// Assistant (model) response.
    Assistant,
}

impl Role {
    /// Lowercase wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author.
    pub role: Role,
    /// Message content.
    pub content: String,
    /// When the message was appended. Display only, never sent.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A `{role, content}` pair as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Body of a chat request: `{"messages": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<WireMessage>,
}

impl ChatRequest {
    /// Build a request from a system instruction and the transcript to replay.
    ///
    /// The system instruction always leads; the transcript follows in order.
    pub fn new<'a>(
        system_prompt: &str,
        transcript: impl IntoIterator<Item = &'a ChatMessage>,
    ) -> Self {
        let mut messages = vec![WireMessage {
            role: Role::System,
            content: system_prompt.to_string(),
        }];
        messages.extend(transcript.into_iter().map(WireMessage::from));
        Self { messages }
    }

    /// The most recent message in the request, if any.
    pub fn last(&self) -> Option<&WireMessage> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_creation() {
        let user_msg = ChatMessage::user("Hello");
        assert_eq!(user_msg.role, Role::User);
        assert_eq!(user_msg.content, "Hello");

        let assistant_msg = ChatMessage::assistant("Hi there!");
        assert_eq!(assistant_msg.role, Role::Assistant);
    }

    #[test]
    fn test_request_leads_with_system_prompt() {
        let transcript = vec![
            ChatMessage::assistant("Hi!"),
            ChatMessage::user("What do you work on?"),
        ];
        let request = ChatRequest::new("Be helpful.", &transcript);

        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, "Be helpful.");
        assert_eq!(request.messages[1].role, Role::Assistant);
        assert_eq!(request.last().unwrap().content, "What do you work on?");
    }

    #[test]
    fn test_request_wire_format_omits_timestamps() {
        let transcript = vec![ChatMessage::user("Hello")];
        let request = ChatRequest::new("Be brief.", &transcript);
        let json = serde_json::to_string(&request).unwrap();

        insta::assert_snapshot!(
            json,
            @r#"{"messages":[{"role":"system","content":"Be brief."},{"role":"user","content":"Hello"}]}"#
        );
    }

    #[test]
    fn test_role_names() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(
            serde_json::to_value(Role::Assistant).unwrap(),
            serde_json::json!("assistant")
        );
    }
}
