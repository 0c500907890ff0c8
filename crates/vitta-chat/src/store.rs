//! In-memory session store: conversations, transcripts, active pointer

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::Message;

/// Display name given to a conversation before its first message
pub const DEFAULT_CONVERSATION_NAME: &str = "New Chat";

/// Display names are cut to this many characters, plus an ellipsis marker
const NAME_LIMIT: usize = 30;

/// Opaque conversation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(Uuid);

impl ConversationId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Conversation metadata; the transcript lives in the store's message map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub name: String,
}

/// All mutable chat state: the conversation list (newest first), the
/// per-conversation transcripts, and the active pointer.
///
/// Invariant: the active id always refers to an entry in the conversation
/// list. Transcript entries are created lazily, so a reply arriving for a
/// deleted conversation still has somewhere to land.
pub struct SessionStore {
    conversations: Vec<Conversation>,
    messages: HashMap<ConversationId, Vec<Message>>,
    active: ConversationId,
}

impl SessionStore {
    /// Create a store with one empty default conversation
    pub fn new() -> Self {
        let id = ConversationId::new();
        Self {
            conversations: vec![Conversation {
                id,
                name: DEFAULT_CONVERSATION_NAME.to_string(),
            }],
            messages: HashMap::from([(id, Vec::new())]),
            active: id,
        }
    }

    /// Create a fresh conversation, prepend it, and make it active
    pub fn create_conversation(&mut self) -> ConversationId {
        let id = ConversationId::new();
        self.conversations.insert(
            0,
            Conversation {
                id,
                name: DEFAULT_CONVERSATION_NAME.to_string(),
            },
        );
        self.messages.insert(id, Vec::new());
        self.active = id;
        id
    }

    /// Delete a conversation and its transcript. Unknown ids are a no-op.
    /// If the active conversation is deleted, the first remaining one in
    /// list order takes over; with none left, a fresh one is created.
    pub fn delete_conversation(&mut self, id: ConversationId) {
        self.conversations.retain(|c| c.id != id);
        self.messages.remove(&id);

        if self.active == id {
            match self.conversations.first() {
                Some(first) => self.active = first.id,
                None => {
                    self.create_conversation();
                }
            }
        }
    }

    /// Append a message, lazily creating the transcript if absent
    pub fn append_message(&mut self, id: ConversationId, message: Message) {
        self.messages.entry(id).or_default().push(message);
    }

    /// Set the display name from the conversation's first message: the
    /// first 30 characters, with an ellipsis marker when truncated. The
    /// controller calls this exactly when the transcript goes from empty
    /// to non-empty, so it runs at most once per conversation.
    pub fn rename_from_first_message(&mut self, id: ConversationId, text: &str) {
        let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == id) else {
            return;
        };
        let truncated: String = text.chars().take(NAME_LIMIT).collect();
        conversation.name = if text.chars().count() > NAME_LIMIT {
            format!("{}...", truncated)
        } else {
            truncated
        };
    }

    /// The active conversation id
    pub fn active(&self) -> ConversationId {
        self.active
    }

    /// Switch the active conversation. Returns false for unknown ids,
    /// leaving the pointer untouched.
    pub fn set_active(&mut self, id: ConversationId) -> bool {
        if self.contains(id) {
            self.active = id;
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: ConversationId) -> bool {
        self.conversations.iter().any(|c| c.id == id)
    }

    /// Conversations in list order, newest first
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Display name of a conversation
    pub fn name(&self, id: ConversationId) -> Option<&str> {
        self.conversations
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    /// Transcript of a conversation; empty for unknown ids
    pub fn messages(&self, id: ConversationId) -> &[Message] {
        self.messages.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
