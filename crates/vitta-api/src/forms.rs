//! Client for the external form-script endpoints (waitlist, feedback)
//!
//! The scripts accept a JSON payload but only with a text/plain content
//! type; anything else is rejected before reaching the handler.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;

use crate::{
    error::{Error, Result},
    types::FormResponse,
};

/// Endpoints for the two one-shot form submissions
#[derive(Debug, Clone)]
pub struct FormConfig {
    /// Waitlist form endpoint, takes `{email}`
    pub waitlist_url: String,
    /// Feedback form endpoint, takes `{text}`
    pub feedback_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl FormConfig {
    pub fn new(waitlist_url: impl Into<String>, feedback_url: impl Into<String>) -> Self {
        Self {
            waitlist_url: waitlist_url.into(),
            feedback_url: feedback_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the waitlist and feedback form endpoints
pub struct FormClient {
    client: reqwest::Client,
    config: FormConfig,
}

impl FormClient {
    pub fn new(config: FormConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::from_transport)?;
        Ok(Self { client, config })
    }

    /// Submit an email address to the waitlist form
    pub async fn submit_email(&self, email: &str) -> Result<()> {
        self.post_form(
            &self.config.waitlist_url,
            serde_json::json!({ "email": email }),
            "Failed to join the waitlist",
        )
        .await
    }

    /// Submit feedback text to the feedback form
    pub async fn submit_feedback(&self, text: &str) -> Result<()> {
        self.post_form(
            &self.config.feedback_url,
            serde_json::json!({ "text": text }),
            "Failed to submit feedback",
        )
        .await
    }

    async fn post_form(
        &self,
        url: &str,
        payload: serde_json::Value,
        reject_message: &str,
    ) -> Result<()> {
        tracing::debug!(%url, "submitting form");

        let body = serde_json::to_string(&payload).map_err(|_| Error::Unexpected)?;
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(Error::from_transport)?;
        parse_form_response(status, &bytes, reject_message)
    }
}

/// A form submission succeeds only on a 2xx response whose body carries
/// `status: "success"`.
fn parse_form_response(status: StatusCode, body: &[u8], reject_message: &str) -> Result<()> {
    if !status.is_success() {
        return Err(Error::from_status(status, body));
    }
    let parsed: FormResponse = serde_json::from_slice(body).map_err(|_| Error::Unexpected)?;
    if parsed.is_success() {
        Ok(())
    } else {
        Err(Error::Rejected(
            parsed.message.unwrap_or_else(|| reject_message.to_string()),
        ))
    }
}
