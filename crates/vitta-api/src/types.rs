//! Wire types for the vitta backend and form endpoints

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Content shown when the backend returns neither a response string nor
/// an explanation
pub const NO_RESPONSE_FALLBACK: &str = "No response available";

/// Request body for POST /query
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub user_id: String,
    pub query: String,
    pub conversation_id: String,
    pub metadata: QueryRequestMetadata,
}

/// Metadata object carried on every query request. The backend expects
/// the placeholder field to be present.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequestMetadata {
    pub additional_info: String,
}

impl Default for QueryRequestMetadata {
    fn default() -> Self {
        Self {
            additional_info: "string".to_string(),
        }
    }
}

/// Raw response body from POST /query. Every field is optional on the
/// wire; content resolution happens in [`QueryResponse::resolve_content`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub source: Option<String>,
}

impl QueryResponse {
    /// Resolve display content with explicit fallback ordering: the
    /// `response` string, else `metadata.explanation`, else a fixed
    /// placeholder. Empty strings count as absent.
    pub fn resolve_content(&self) -> String {
        if let Some(response) = self.response.as_deref().filter(|s| !s.is_empty()) {
            return response.to_string();
        }
        if let Some(explanation) = self
            .metadata
            .as_ref()
            .and_then(|m| m.get("explanation"))
            .and_then(|e| e.as_str())
            .filter(|s| !s.is_empty())
        {
            return explanation.to_string();
        }
        NO_RESPONSE_FALLBACK.to_string()
    }
}

/// A normalized assistant reply, either from the backend or from the
/// canned resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    /// Display content
    pub content: String,
    /// Provenance metadata echoed from the backend, if any
    pub metadata: Option<serde_json::Value>,
    /// Reply source tag (e.g. "static" for canned replies)
    pub source: Option<String>,
}

impl AssistantReply {
    /// Create a plain text reply with no provenance
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: None,
            source: None,
        }
    }
}

impl From<QueryResponse> for AssistantReply {
    fn from(response: QueryResponse) -> Self {
        Self {
            content: response.resolve_content(),
            metadata: response.metadata,
            source: response.source,
        }
    }
}

/// Response contract of the external form scripts
#[derive(Debug, Clone, Deserialize)]
pub struct FormResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FormResponse {
    /// The scripts signal acceptance with a literal "success" status
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

/// An insurance policy record as returned by GET /policies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub metadata: PolicyMetadata,
    /// Document file name
    pub name: String,
    /// Link to the policy document
    pub link: String,
}

/// Structured policy fields extracted by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyMetadata {
    pub policy_type: String,
    pub policy_number: String,
    pub policy_holder_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub coverage_amount: f64,
    pub premium_amount: f64,
}

/// Renewal urgency derived from a policy's end date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalStatus {
    /// End date has passed
    Overdue,
    /// 30 days or fewer remaining
    DueSoon { days_left: i64 },
    /// More than 30 days remaining
    Active { days_left: i64 },
}

impl PolicyMetadata {
    /// Days until the policy's end date, negative once expired
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days()
    }

    /// Classify renewal urgency relative to `today`
    pub fn renewal_status(&self, today: NaiveDate) -> RenewalStatus {
        let days_left = self.days_left(today);
        if days_left <= 0 {
            RenewalStatus::Overdue
        } else if days_left <= 30 {
            RenewalStatus::DueSoon { days_left }
        } else {
            RenewalStatus::Active { days_left }
        }
    }
}

/// Response body of DELETE /policy/{key}
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyDeletion {
    pub success: bool,
    #[serde(default)]
    pub data: Option<PolicyDeletionData>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyDeletionData {
    pub regeneration_summary: RegenerationSummary,
}

/// The backend regenerates derived data after a delete; failures here are
/// a warning, not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegenerationSummary {
    #[serde(default)]
    pub failed_regenerations: u32,
}

/// Request body for POST /extract-policy
#[derive(Debug, Clone, Serialize)]
pub struct ExtractPolicyRequest {
    pub pdf_name: String,
    pub pdf_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_content_prefers_response() {
        let response = QueryResponse {
            response: Some("direct answer".to_string()),
            metadata: Some(serde_json::json!({"explanation": "fallback"})),
            source: None,
        };
        assert_eq!(response.resolve_content(), "direct answer");
    }

    #[test]
    fn test_resolve_content_falls_back_to_explanation() {
        let response = QueryResponse {
            response: None,
            metadata: Some(serde_json::json!({"explanation": "from metadata"})),
            source: None,
        };
        assert_eq!(response.resolve_content(), "from metadata");
    }

    #[test]
    fn test_resolve_content_empty_response_falls_through() {
        let response = QueryResponse {
            response: Some(String::new()),
            metadata: Some(serde_json::json!({"explanation": "from metadata"})),
            source: None,
        };
        assert_eq!(response.resolve_content(), "from metadata");
    }

    #[test]
    fn test_resolve_content_placeholder_when_nothing_usable() {
        let response = QueryResponse::default();
        assert_eq!(response.resolve_content(), NO_RESPONSE_FALLBACK);

        let response = QueryResponse {
            response: None,
            metadata: Some(serde_json::json!({"confidence": 0.4})),
            source: None,
        };
        assert_eq!(response.resolve_content(), NO_RESPONSE_FALLBACK);
    }

    #[test]
    fn test_form_response_success() {
        let ok: FormResponse = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(ok.is_success());

        let rejected: FormResponse =
            serde_json::from_str(r#"{"status": "error", "message": "quota"}"#).unwrap();
        assert!(!rejected.is_success());
        assert_eq!(rejected.message.as_deref(), Some("quota"));

        let empty: FormResponse = serde_json::from_str("{}").unwrap();
        assert!(!empty.is_success());
    }

    #[test]
    fn test_policy_decodes_iso_dates() {
        let json = r#"{
            "metadata": {
                "policy_type": "Health",
                "policy_number": "POL-42",
                "policy_holder_name": "John",
                "start_date": "2024-04-01",
                "end_date": "2025-03-31",
                "coverage_amount": 500000.0,
                "premium_amount": 12000.0
            },
            "name": "health_policy.pdf",
            "link": "https://example.com/health_policy.pdf"
        }"#;
        let policy: Policy = serde_json::from_str(json).unwrap();
        assert_eq!(
            policy.metadata.start_date,
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        );
        assert_eq!(policy.metadata.policy_number, "POL-42");
    }

    #[test]
    fn test_renewal_status_boundaries() {
        let metadata = PolicyMetadata {
            policy_type: "Motor".to_string(),
            policy_number: "M-1".to_string(),
            policy_holder_name: "John".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            coverage_amount: 100000.0,
            premium_amount: 5000.0,
        };

        let on_end = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        assert_eq!(metadata.renewal_status(on_end), RenewalStatus::Overdue);

        let month_before = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(
            metadata.renewal_status(month_before),
            RenewalStatus::DueSoon { days_left: 29 }
        );

        let far_out = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert!(matches!(
            metadata.renewal_status(far_out),
            RenewalStatus::Active { .. }
        ));
    }
}
