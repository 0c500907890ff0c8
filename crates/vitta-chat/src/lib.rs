//! vitta-chat: Multi-conversation chat session management
//!
//! The [`ChatController`] routes each piece of user input to the canned
//! resolver, the remote backend, or one of the capture sub-flows, and
//! applies the outcome to an in-memory [`SessionStore`]. The backend sits
//! behind the [`ChatBackend`] trait so presentation layers and tests stay
//! independent of HTTP.

pub mod backend;
pub mod canned;
pub mod controller;
pub mod events;
pub mod message;
pub mod store;

pub use backend::{ChatBackend, RemoteBackend};
pub use controller::{ChatController, InputMode, SubmitOutcome};
pub use events::ChatEvent;
pub use message::{Author, Message};
pub use store::{Conversation, ConversationId, SessionStore};
