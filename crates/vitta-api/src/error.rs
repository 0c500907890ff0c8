//! Error types for vitta-api

use thiserror::Error;

/// Result type alias using vitta-api Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the query and form clients.
///
/// The display strings double as the user-facing messages rendered into
/// the chat transcript, so they are phrased for end users.
#[derive(Error, Debug)]
pub enum Error {
    /// The request exceeded the configured timeout
    #[error("Request timed out. Please try again.")]
    Timeout,

    /// The server responded with a non-success status
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// No response was received at all
    #[error("Unable to reach the server. Please check your internet connection.")]
    Network,

    /// The server answered but declined the operation (e.g. a form
    /// submission with a non-success status field). The message is for
    /// logs, not for the chat transcript.
    #[error("{0}")]
    Rejected(String),

    /// Anything that doesn't fit the categories above
    #[error("An unexpected error occurred. Please try again later.")]
    Unexpected,
}

impl Error {
    /// Create a server error from a status and message
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Classify a transport-level reqwest failure, in priority order:
    /// timeout, then malformed request/response, then connectivity.
    /// Non-2xx statuses never reach this point; they are classified from
    /// the response body by the caller.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_builder() || err.is_decode() {
            Error::Unexpected
        } else {
            Error::Network
        }
    }

    /// Build a [`Error::Server`] from a non-2xx response, preferring the
    /// body's `message` field over the status' canonical reason.
    pub fn from_status(status: reqwest::StatusCode, body: &[u8]) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorBody {
            message: Option<String>,
        }

        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        Error::server(status.as_u16(), message)
    }
}
