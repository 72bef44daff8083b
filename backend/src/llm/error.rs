//! Upstream LLM errors

use thiserror::Error;

use crate::llm::constants::RETRYABLE_STATUS;

/// Failure of a single call to the upstream model, or of the whole retry loop
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The service reported itself overloaded (HTTP 503)
    #[error("Gemini API is unavailable (HTTP 503): {body}")]
    Unavailable {
        /// Error body returned by the API
        body: String,
    },

    /// Any other non-success HTTP status
    #[error("Gemini API returned error status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error body returned by the API
        body: String,
    },

    /// Transport failure or timeout
    #[error("Failed to reach Gemini API: {0}")]
    Network(String),

    /// Body could not be parsed
    #[error("Invalid response from Gemini API: {0}")]
    InvalidResponse(String),

    /// The prompt was rejected by safety filters
    #[error("Gemini API blocked the prompt: {0}")]
    Blocked(String),

    /// HTTP 200 with no reply text
    #[error("Gemini API returned no reply")]
    EmptyReply,

    /// Every attempt hit a retryable failure
    #[error("Gemini API is still unavailable after {attempts} attempts")]
    Exhausted {
        /// Attempts made before giving up
        attempts: u32,
    },
}

impl UpstreamError {
    /// Build the error for a non-success HTTP status
    pub fn from_status(status: u16, body: String) -> Self {
        if status == RETRYABLE_STATUS {
            UpstreamError::Unavailable { body }
        } else {
            UpstreamError::Status { status, body }
        }
    }

    /// Whether another attempt may succeed. Only 503 qualifies.
    pub fn is_retryable(&self) -> bool {
        matches!(self, UpstreamError::Unavailable { .. })
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL never reaches clients or logs
        UpstreamError::Network(err.without_url().to_string())
    }
}
