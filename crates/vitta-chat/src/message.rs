//! Chat messages as they appear in a conversation transcript

use serde::{Deserialize, Serialize};
use vitta_api::AssistantReply;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Assistant,
}

/// One transcript entry. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Display content
    pub content: String,
    /// Author flag
    pub author: Author,
    /// Local wall-clock hour:minute, captured when the message is created
    /// (which is append time), not when a request was issued
    pub timestamp: String,
    /// Set on assistant messages that render a failure
    #[serde(default)]
    pub is_error: bool,
    /// Provenance metadata for assistant replies
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    /// Reply source tag for assistant replies
    #[serde(default)]
    pub source: Option<String>,
}

impl Message {
    /// Create a user-authored message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: Author::User,
            timestamp: local_clock(),
            is_error: false,
            metadata: None,
            source: None,
        }
    }

    /// Create an assistant message from a backend or canned reply
    pub fn assistant(reply: AssistantReply) -> Self {
        Self {
            content: reply.content,
            author: Author::Assistant,
            timestamp: local_clock(),
            is_error: false,
            metadata: reply.metadata,
            source: reply.source,
        }
    }

    /// Create a plain assistant message with no provenance
    pub fn assistant_text(content: impl Into<String>) -> Self {
        Self::assistant(AssistantReply::text(content))
    }

    /// Create an assistant message carrying a failure
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::assistant_text(content)
        }
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }
}

/// Localized hour:minute of the local wall clock
fn local_clock() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let message = Message::user("hello");
        assert!(message.is_user());
        assert!(!message.is_error);
        assert_eq!(message.content, "hello");
    }

    #[test]
    fn test_error_message_is_assistant_authored() {
        let message = Message::error("Server error: 500 - db down");
        assert_eq!(message.author, Author::Assistant);
        assert!(message.is_error);
    }

    #[test]
    fn test_timestamp_is_hour_minute() {
        let message = Message::user("hi");
        let parts: Vec<&str> = message.timestamp.split(':').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 2);
        assert_eq!(parts[1].len(), 2);
    }
}
