//! HTTP client for the vitta chat backend

use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::{
    error::{Error, Result},
    types::{
        AssistantReply, ExtractPolicyRequest, Policy, PolicyDeletion, QueryRequest,
        QueryRequestMetadata, QueryResponse, RegenerationSummary,
    },
};

/// Explicit client configuration; nothing is read from ambient state.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the chat backend, without a trailing slash
    pub base_url: String,
    /// Fixed user identifier sent with every query
    pub user_id: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_id: user_id.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the chat backend: queries and policy operations
pub struct ApiClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new client from explicit configuration
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        // The backend sits behind an ngrok tunnel; without this it answers
        // with an interstitial page instead of JSON
        headers.insert("ngrok-skip-browser-warning", HeaderValue::from_static("69420"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(Error::from_transport)?;

        Ok(Self { client, config })
    }

    /// Send a chat query, correlated to a conversation.
    ///
    /// No retry is performed here; failures are surfaced as typed errors
    /// for the caller to render.
    pub async fn query(&self, text: &str, conversation_id: &str) -> Result<AssistantReply> {
        let url = format!("{}/query", self.config.base_url);
        tracing::debug!(%url, conversation_id, "sending query");

        let request = QueryRequest {
            user_id: self.config.user_id.clone(),
            query: text.to_string(),
            conversation_id: conversation_id.to_string(),
            metadata: QueryRequestMetadata::default(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(Error::from_transport)?;
        parse_query_response(status, &body)
    }

    /// Fetch all policies, keyed by the backend's policy key
    pub async fn policies(&self) -> Result<HashMap<String, Policy>> {
        let url = format!("{}/policies", self.config.base_url);
        tracing::debug!(%url, "fetching policies");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(Error::from_transport)?;
        if !status.is_success() {
            return Err(Error::from_status(status, &body));
        }
        serde_json::from_slice(&body).map_err(|_| Error::Unexpected)
    }

    /// Delete a policy. Returns the regeneration summary so the caller
    /// can warn about partial regeneration failures.
    pub async fn delete_policy(&self, key: &str) -> Result<RegenerationSummary> {
        let url = format!("{}/policy/{}", self.config.base_url, key);
        tracing::debug!(%url, "deleting policy");

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(Error::from_transport)?;
        parse_deletion_response(status, &body)
    }

    /// Ask the backend to extract a policy from an already-uploaded
    /// document. A 2xx status means the document was accepted.
    pub async fn extract_policy(&self, pdf_name: &str, pdf_link: &str) -> Result<()> {
        let url = format!("{}/extract-policy", self.config.base_url);
        tracing::debug!(%url, pdf_name, "requesting policy extraction");

        let request = ExtractPolicyRequest {
            pdf_name: pdf_name.to_string(),
            pdf_link: pdf_link.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.map_err(Error::from_transport)?;
            return Err(Error::from_status(status, &body));
        }
        Ok(())
    }
}

/// Classify a query response from its status and raw body
fn parse_query_response(status: StatusCode, body: &[u8]) -> Result<AssistantReply> {
    if !status.is_success() {
        return Err(Error::from_status(status, body));
    }
    let parsed: QueryResponse = serde_json::from_slice(body).map_err(|_| Error::Unexpected)?;
    Ok(parsed.into())
}

/// Classify a deletion response. A 2xx body with `success: false` is a
/// rejection carrying the server's message.
fn parse_deletion_response(status: StatusCode, body: &[u8]) -> Result<RegenerationSummary> {
    if !status.is_success() {
        return Err(Error::from_status(status, body));
    }
    let parsed: PolicyDeletion = serde_json::from_slice(body).map_err(|_| Error::Unexpected)?;
    if !parsed.success {
        return Err(Error::Rejected(
            parsed
                .message
                .unwrap_or_else(|| "Failed to delete policy".to_string()),
        ));
    }
    Ok(parsed
        .data
        .map(|d| d.regeneration_summary)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_response_success() {
        let reply = parse_query_response(
            StatusCode::OK,
            br#"{"response": "Your premium is due in May.", "source": "rag"}"#,
        )
        .unwrap();
        assert_eq!(reply.content, "Your premium is due in May.");
        assert_eq!(reply.source.as_deref(), Some("rag"));
    }

    #[test]
    fn test_query_response_explanation_fallback() {
        let reply = parse_query_response(
            StatusCode::OK,
            br#"{"metadata": {"explanation": "No matching policy found."}}"#,
        )
        .unwrap();
        assert_eq!(reply.content, "No matching policy found.");
    }

    #[test]
    fn test_query_response_server_error_carries_status_and_message() {
        let err =
            parse_query_response(StatusCode::INTERNAL_SERVER_ERROR, br#"{"message": "db down"}"#)
                .unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("500"));
        assert!(rendered.contains("db down"));
    }

    #[test]
    fn test_query_response_garbage_body_is_unexpected() {
        let err = parse_query_response(StatusCode::OK, b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, Error::Unexpected));
    }

    #[test]
    fn test_deletion_success_with_summary() {
        let summary = parse_deletion_response(
            StatusCode::OK,
            br#"{"success": true, "data": {"regeneration_summary": {"failed_regenerations": 2}}}"#,
        )
        .unwrap();
        assert_eq!(summary.failed_regenerations, 2);
    }

    #[test]
    fn test_deletion_rejected_carries_server_message() {
        let err = parse_deletion_response(
            StatusCode::OK,
            br#"{"success": false, "message": "policy is referenced"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Rejected(ref m) if m == "policy is referenced"));
    }

    #[test]
    fn test_deletion_rejected_default_message() {
        let err = parse_deletion_response(StatusCode::OK, br#"{"success": false}"#).unwrap_err();
        assert!(matches!(err, Error::Rejected(ref m) if m == "Failed to delete policy"));
    }
}
