//! Conversation controller: routes user input and applies the results
//! to the session store
//!
//! The controller is a single logical actor. The store sits behind a
//! mutex that is never held across an await, so while one submission
//! waits on the backend the caller can still switch, create, or delete
//! conversations. Every append targets the conversation id captured at
//! submission time; a reply that resolves after its conversation was
//! switched away from (or deleted) still lands in that conversation's
//! transcript.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::backend::ChatBackend;
use crate::canned;
use crate::events::ChatEvent;
use crate::message::Message;
use crate::store::{Conversation, ConversationId, SessionStore};

/// Appended after a successful waitlist submission
const WAITLIST_THANKS: &str =
    "Thank you for joining our waitlist! We'll keep you updated on our latest developments.";
/// Appended after a failed waitlist submission
const WAITLIST_APOLOGY: &str =
    "Sorry, there was an error processing your request. Please try again later.";
/// Appended after a successful feedback submission
const FEEDBACK_THANKS: &str =
    "Thank you for your feedback! We really appreciate your help in making Vitta better.";
/// Appended after a failed feedback submission
const FEEDBACK_APOLOGY: &str =
    "Sorry, there was an error submitting your feedback. Please try again later.";

/// Where the next piece of raw user input is routed. The two capture
/// modes are one enum, so they can never both be active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Normal chat: canned resolver first, then the backend
    #[default]
    Normal,
    /// Next input is an email address for the waitlist
    AwaitingEmail,
    /// Next input is feedback text
    AwaitingFeedback,
}

/// What [`ChatController::submit`] did with the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, dropped with no state change
    Ignored,
    /// Canned reply appended without touching the network
    Canned,
    /// Backend reply, or its error message, appended
    Answered,
    /// Email capture attempt completed, success or failure
    EmailSubmitted,
    /// Feedback capture attempt completed, success or failure
    FeedbackSubmitted,
}

/// Orchestrates user input against the session store and the backend
pub struct ChatController {
    store: Mutex<SessionStore>,
    mode: Mutex<InputMode>,
    composing: AtomicBool,
    backend: Arc<dyn ChatBackend>,
    event_tx: broadcast::Sender<ChatEvent>,
}

impl ChatController {
    /// Create a controller with one empty default conversation
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            store: Mutex::new(SessionStore::new()),
            mode: Mutex::new(InputMode::Normal),
            composing: AtomicBool::new(false),
            backend,
            event_tx,
        }
    }

    /// Subscribe to controller events
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.event_tx.subscribe()
    }

    /// Whether an assistant reply is pending
    pub fn is_composing(&self) -> bool {
        self.composing.load(Ordering::SeqCst)
    }

    /// Current input routing mode
    pub fn mode(&self) -> InputMode {
        *self.mode.lock()
    }

    /// The active conversation id
    pub fn active_conversation(&self) -> ConversationId {
        self.store.lock().active()
    }

    /// Conversations in list order, newest first
    pub fn conversations(&self) -> Vec<Conversation> {
        self.store.lock().conversations().to_vec()
    }

    /// Snapshot of a conversation's transcript
    pub fn transcript(&self, id: ConversationId) -> Vec<Message> {
        self.store.lock().messages(id).to_vec()
    }

    /// Create a fresh conversation and make it active
    pub fn new_conversation(&self) -> ConversationId {
        self.store.lock().create_conversation()
    }

    /// Switch the active conversation; false for unknown ids
    pub fn switch_conversation(&self, id: ConversationId) -> bool {
        self.store.lock().set_active(id)
    }

    /// Delete a conversation; the store picks a replacement if needed
    pub fn delete_conversation(&self, id: ConversationId) {
        self.store.lock().delete_conversation(id);
    }

    /// Handle one piece of typed user input.
    ///
    /// Blank input is rejected silently in every mode. Otherwise the user
    /// message is appended (renaming the conversation if it was empty)
    /// and the input is routed per the current mode: an active capture
    /// sub-flow consumes it, anything else goes through the canned
    /// resolver and then the backend.
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let conversation = self.append_user_message(text);

        match self.mode() {
            InputMode::AwaitingEmail => {
                self.set_composing(true);
                let result = self.backend.submit_email(text).await;
                self.set_composing(false);
                self.finish_capture(conversation, result, WAITLIST_THANKS, WAITLIST_APOLOGY);
                SubmitOutcome::EmailSubmitted
            }
            InputMode::AwaitingFeedback => {
                self.set_composing(true);
                let result = self.backend.submit_feedback(text).await;
                self.set_composing(false);
                self.finish_capture(conversation, result, FEEDBACK_THANKS, FEEDBACK_APOLOGY);
                SubmitOutcome::FeedbackSubmitted
            }
            InputMode::Normal => {
                if let Some(reply) = canned::static_response(text) {
                    self.append(conversation, Message::assistant(reply));
                    return SubmitOutcome::Canned;
                }

                self.set_composing(true);
                let result = self.backend.query(text, &conversation.to_string()).await;
                self.set_composing(false);

                match result {
                    Ok(reply) => self.append(conversation, Message::assistant(reply)),
                    Err(err) => {
                        tracing::warn!(%conversation, "query failed: {err}");
                        self.append(conversation, Message::error(err.to_string()));
                    }
                }
                SubmitOutcome::Answered
            }
        }
    }

    /// Handle a suggested phrase selected instead of typed. The user
    /// message and the canned reply are appended synchronously; the
    /// waitlist and feedback triggers then arm their capture sub-flow.
    /// Phrases without a canned reply behave like typed input.
    pub async fn quick_action(&self, phrase: &str) -> SubmitOutcome {
        let Some(reply) = canned::static_response(phrase) else {
            return self.submit(phrase).await;
        };

        let conversation = self.store.lock().active();
        self.append(conversation, Message::user(phrase));
        self.append(conversation, Message::assistant(reply));

        match phrase {
            canned::WAITLIST_TRIGGER => self.set_mode(InputMode::AwaitingEmail),
            canned::FEEDBACK_TRIGGER => self.set_mode(InputMode::AwaitingFeedback),
            _ => {}
        }
        SubmitOutcome::Canned
    }

    /// Append the user message to the active conversation, renaming it
    /// when this is its first message. Returns the id the eventual reply
    /// must land in.
    fn append_user_message(&self, text: &str) -> ConversationId {
        let (conversation, message) = {
            let mut store = self.store.lock();
            let id = store.active();
            if store.messages(id).is_empty() {
                store.rename_from_first_message(id, text);
            }
            let message = Message::user(text);
            store.append_message(id, message.clone());
            (id, message)
        };
        let _ = self.event_tx.send(ChatEvent::MessageAppended {
            conversation_id: conversation,
            message,
        });
        conversation
    }

    /// Append the thank-you or apology for a capture attempt and drop
    /// back to normal mode. One attempt only: the mode resets regardless
    /// of outcome.
    fn finish_capture(
        &self,
        conversation: ConversationId,
        result: vitta_api::Result<()>,
        thanks: &str,
        apology: &str,
    ) {
        match result {
            Ok(()) => self.append(conversation, Message::assistant_text(thanks)),
            Err(err) => {
                tracing::warn!(%conversation, "submission failed: {err}");
                self.append(conversation, Message::error(apology));
            }
        }
        self.set_mode(InputMode::Normal);
    }

    fn append(&self, conversation: ConversationId, message: Message) {
        self.store.lock().append_message(conversation, message.clone());
        let _ = self.event_tx.send(ChatEvent::MessageAppended {
            conversation_id: conversation,
            message,
        });
    }

    fn set_composing(&self, active: bool) {
        if self.composing.swap(active, Ordering::SeqCst) != active {
            let _ = self.event_tx.send(ChatEvent::Composing { active });
        }
    }

    fn set_mode(&self, mode: InputMode) {
        let mut current = self.mode.lock();
        if *current != mode {
            *current = mode;
            let _ = self.event_tx.send(ChatEvent::ModeChanged { mode });
        }
    }
}
