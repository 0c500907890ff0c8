//! Controller event types

use serde::{Deserialize, Serialize};

use crate::controller::InputMode;
use crate::message::Message;
use crate::store::ConversationId;

/// Events broadcast by the controller so a presentation layer can
/// re-render without polling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message was appended to a conversation's transcript
    MessageAppended {
        conversation_id: ConversationId,
        message: Message,
    },

    /// The composing indicator turned on or off
    Composing { active: bool },

    /// Input routing changed (entering or leaving a capture sub-flow)
    ModeChanged { mode: InputMode },
}
