//! Backend seam between the controller and the HTTP clients

use async_trait::async_trait;
use vitta_api::{ApiClient, AssistantReply, FormClient, Result};

/// Remote operations the controller depends on. Implemented over HTTP in
/// [`RemoteBackend`] and by mocks in tests.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send a chat query correlated to a conversation
    async fn query(&self, text: &str, conversation_id: &str) -> Result<AssistantReply>;

    /// One-shot waitlist submission
    async fn submit_email(&self, email: &str) -> Result<()>;

    /// One-shot feedback submission
    async fn submit_feedback(&self, text: &str) -> Result<()>;
}

/// Production backend: the chat API plus the external form endpoints
pub struct RemoteBackend {
    api: ApiClient,
    forms: FormClient,
}

impl RemoteBackend {
    pub fn new(api: ApiClient, forms: FormClient) -> Self {
        Self { api, forms }
    }
}

#[async_trait]
impl ChatBackend for RemoteBackend {
    async fn query(&self, text: &str, conversation_id: &str) -> Result<AssistantReply> {
        self.api.query(text, conversation_id).await
    }

    async fn submit_email(&self, email: &str) -> Result<()> {
        self.forms.submit_email(email).await
    }

    async fn submit_feedback(&self, text: &str) -> Result<()> {
        self.forms.submit_feedback(text).await
    }
}
